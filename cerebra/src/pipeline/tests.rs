use common::setup_logging;
use common::test_utils::test_output_path;

use super::*;
use crate::atlas::Region;
use crate::raster::{Image, Rgb, to_rgb_image};
use crate::testing::{add_noise, banded_atlas, lesion_atlas, synthetic_scan};

const SIZE: usize = 160;

fn test_config() -> Config {
    Config {
        working_resolution: SIZE,
        ..Default::default()
    }
}

fn test_pipeline() -> TumorPipeline {
    let atlas = Arc::new(AtlasRegionSet::build(&banded_atlas(SIZE)));
    TumorPipeline::new(test_config(), atlas).unwrap()
}

#[test]
fn locates_central_tumor() {
    let _logger = setup_logging("debug");
    let pipeline = test_pipeline();
    let scan = synthetic_scan(SIZE, 30.0);

    let output = pipeline.run(&scan).unwrap();

    assert_eq!(
        output.classification,
        ClassificationResult::Regions(vec![Region::Frontal, Region::Parietal])
    );
    assert_eq!(output.classification.to_string(), "frontal, parietal");

    let d = &output.diagnostics;
    assert_eq!(d.resized_from, None);
    assert!(d.brain_area > 10_000, "{:?}", d);
    assert!(d.mask_pixels > 2_000, "{:?}", d);
    assert!(d.tumor_area > 1_500.0, "{:?}", d);
    let bounds = d.tumor_bounds.unwrap();
    assert!(bounds.min.row > 40 && bounds.max.row < 120, "{:?}", bounds);
    assert!(bounds.min.col > 40 && bounds.max.col < 120, "{:?}", bounds);

    let outline = output
        .annotated
        .iter()
        .filter(|&&p| p == Rgb::GREEN)
        .count();
    assert!(outline > 100);
    assert_eq!(output.overlay.dimensions(), (SIZE, SIZE));
    assert_eq!(output.overlay[(80, 80)], Rgb::RED);

    to_rgb_image(&output.annotated)
        .save(test_output_path("cerebra_pipeline_annotated.png"))
        .unwrap();
}

#[test]
fn noisy_scan_gives_same_regions() {
    let pipeline = test_pipeline();
    let mut scan = synthetic_scan(SIZE, 30.0);
    add_noise(&mut scan, 8, 42);

    let output = pipeline.run(&scan).unwrap();

    assert_eq!(
        output.classification.regions(),
        &[Region::Frontal, Region::Parietal]
    );
}

#[test]
fn uniform_scan_has_no_tumor() {
    let pipeline = test_pipeline();
    let scan = Image::new_filled(SIZE, SIZE, 100u8);

    let output = pipeline.run(&scan).unwrap();

    assert_eq!(output.classification, ClassificationResult::NoTumor);
    assert_eq!(output.classification.to_string(), "no tumor found");
    assert_eq!(output.diagnostics.tumor_bounds, None);
    assert!(output.annotated.iter().all(|&p| p != Rgb::GREEN));
}

#[test]
fn atlas_image_as_input_outlines_its_brightest_region() {
    let atlas_image = lesion_atlas(SIZE);
    let atlas = Arc::new(AtlasRegionSet::build(&atlas_image));
    let pipeline = TumorPipeline::new(test_config(), atlas).unwrap();

    let first = pipeline.run(&atlas_image).unwrap();
    let second = pipeline.run(&atlas_image).unwrap();

    assert_eq!(first.classification, second.classification);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.annotated, second.annotated);

    // The outline starts just above the square's top-left corner, runs down
    // its left side past the middle row, then along its inner bottom edge.
    assert_eq!(
        first.classification,
        ClassificationResult::Regions(vec![
            Region::BasalGanglia,
            Region::Parietal,
            Region::Temporal
        ])
    );

    let d = &first.diagnostics;
    assert!(d.tumor_area > 1_200.0, "{:?}", d);
    let bounds = d.tumor_bounds.unwrap();
    assert!((58..=61).contains(&bounds.min.row), "{:?}", bounds);
    assert!((58..=61).contains(&bounds.min.col), "{:?}", bounds);
    assert!((98..=101).contains(&bounds.max.row), "{:?}", bounds);
    assert!((98..=101).contains(&bounds.max.col), "{:?}", bounds);

    let contour = first.contour.as_ref().unwrap();
    for region in first.classification.regions() {
        assert!(
            contour
                .points()
                .iter()
                .any(|&p| pipeline.atlas().contains(*region, p)),
            "{region} has no contour point"
        );
    }
}

#[test]
fn resamples_other_sizes() {
    let pipeline = test_pipeline();
    let scan = synthetic_scan(200, 37.5);

    let output = pipeline.run(&scan).unwrap();

    assert_eq!(output.diagnostics.resized_from, Some((200, 200)));
    assert_eq!(output.annotated.dimensions(), (SIZE, SIZE));
    assert_eq!(
        output.classification.regions(),
        &[Region::Frontal, Region::Parietal]
    );
}

#[test]
fn rejects_other_sizes_without_resampling() {
    let atlas = Arc::new(AtlasRegionSet::build(&banded_atlas(SIZE)));
    let config = Config {
        resize_to_working: false,
        ..test_config()
    };
    let pipeline = TumorPipeline::new(config, atlas).unwrap();

    let result = pipeline.run(&Image::new_default(100, 120));

    assert!(matches!(
        result,
        Err(PipelineError::ResolutionMismatch {
            expected: (SIZE, SIZE),
            actual: (100, 120),
        })
    ));
}

#[test]
fn rejects_atlas_of_wrong_size() {
    let atlas = Arc::new(AtlasRegionSet::build(&banded_atlas(64)));

    let result = TumorPipeline::new(test_config(), atlas);

    assert!(matches!(
        result,
        Err(PipelineError::AtlasResolution {
            expected: SIZE,
            actual: (64, 64),
        })
    ));
}

#[test]
fn rejects_empty_scan() {
    let result = test_pipeline().run(&Image::new(0, 0, Vec::new()));
    assert!(matches!(result, Err(PipelineError::EmptyImage)));
}

#[test]
fn color_input_matches_gray_input() {
    let pipeline = test_pipeline();
    let scan = synthetic_scan(SIZE, 30.0);

    let gray = pipeline.run(&scan).unwrap();
    let color = pipeline.run_color(&scan.to_color()).unwrap();

    assert_eq!(gray.classification, color.classification);
    assert_eq!(gray.annotated, color.annotated);
}

#[test]
fn batch_matches_sequential_runs() {
    let pipeline = test_pipeline();
    let scans = vec![
        synthetic_scan(SIZE, 30.0),
        Image::new_default(SIZE, SIZE),
        synthetic_scan(SIZE, 0.0),
    ];

    let batch = pipeline.run_batch(&scans);

    assert_eq!(batch.len(), scans.len());
    for (scan, result) in scans.iter().zip(&batch) {
        let expected = pipeline.run(scan).unwrap();
        let actual = result.as_ref().unwrap();
        assert_eq!(actual.classification, expected.classification);
        assert_eq!(actual.diagnostics, expected.diagnostics);
    }
    assert!(batch[0].as_ref().unwrap().classification.is_tumor());
    assert_eq!(
        batch[1].as_ref().unwrap().classification,
        ClassificationResult::NoTumor
    );
}
