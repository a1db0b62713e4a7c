//! Benchmark for the full tumor pipeline on a synthetic 600x600 scan.
//!
//! Run with: cargo bench -p cerebra --bench pipeline

use std::hint::black_box;
use std::sync::Arc;

use cerebra::{AtlasRegionSet, Config, GrayImage, Image, Region, TumorPipeline};
use criterion::{Criterion, criterion_group, criterion_main};

const SIZE: usize = 600;

fn synthetic_atlas() -> GrayImage {
    Image::from_fn(SIZE, SIZE, |x, y| {
        let region = match (y * 4 / SIZE, x < SIZE / 2) {
            (0, _) => Region::Occipital,
            (3, _) => Region::Temporal,
            (_, true) => Region::Frontal,
            (_, false) => Region::Parietal,
        };
        region.atlas_value()
    })
}

fn synthetic_scan() -> GrayImage {
    let c = SIZE as f32 / 2.0;
    Image::from_fn(SIZE, SIZE, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        if dx * dx + dy * dy <= 90.0 * 90.0 {
            230
        } else if (dx / 260.0).powi(2) + (dy / 230.0).powi(2) <= 1.0 {
            100
        } else {
            0
        }
    })
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let atlas = Arc::new(AtlasRegionSet::build(&synthetic_atlas()));
    let pipeline = TumorPipeline::new(Config::default(), atlas).expect("atlas matches config");
    let scan = synthetic_scan();

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);
    group.bench_function("run_600", |b| {
        b.iter(|| pipeline.run(black_box(&scan)).expect("pipeline run"))
    });
    group.finish();
}

criterion_group!(benches, pipeline_benchmarks);
criterion_main!(benches);
