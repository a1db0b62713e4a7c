use super::*;
use crate::raster::Coord;
use crate::testing::banded_atlas;

fn contour(points: &[(usize, usize)], size: usize) -> Contour {
    Contour::new(
        points.iter().map(|&(r, c)| Coord::new(r, c)).collect(),
        size,
        size,
    )
}

#[test]
fn regions_in_first_encounter_order() {
    let atlas = AtlasRegionSet::build(&banded_atlas(64));
    // parietal, frontal, parietal again, temporal, frontal again
    let c = contour(&[(30, 50), (30, 10), (31, 50), (60, 20), (40, 5)], 64);

    let regions = classify(&c, &atlas).unwrap();

    assert_eq!(
        regions,
        vec![Region::Parietal, Region::Frontal, Region::Temporal]
    );
}

#[test]
fn unlabeled_points_are_skipped() {
    let mut image = banded_atlas(16);
    image.fill(0);
    image[(3, 3)] = Region::Occipital.atlas_value();
    let atlas = AtlasRegionSet::build(&image);

    let c = contour(&[(0, 0), (3, 3), (5, 5)], 16);

    assert_eq!(classify(&c, &atlas).unwrap(), vec![Region::Occipital]);
    assert_eq!(
        classify(&contour(&[(0, 0)], 16), &atlas).unwrap(),
        Vec::<Region>::new()
    );
}

#[test]
fn frame_mismatch_is_an_error() {
    let atlas = AtlasRegionSet::build(&banded_atlas(64));
    let c = contour(&[(1, 1)], 32);

    assert_eq!(
        classify(&c, &atlas),
        Err(PipelineError::ResolutionMismatch {
            expected: (64, 64),
            actual: (32, 32),
        })
    );
}

#[test]
fn result_display() {
    let atlas = AtlasRegionSet::build(&banded_atlas(64));
    let c = contour(&[(2, 2), (2, 5), (30, 10)], 64);

    let result = ClassificationResult::from_detection(Some(&c), &atlas).unwrap();
    assert_eq!(result.to_string(), "basal_ganglia, corpus_callosum, frontal");
    assert!(result.is_tumor());

    let none = ClassificationResult::from_detection(None, &atlas).unwrap();
    assert_eq!(none.to_string(), "no tumor found");
    assert!(none.regions().is_empty());
}
