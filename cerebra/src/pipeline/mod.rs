//! The per-scan pipeline and batch runs over independent scans.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::atlas::AtlasRegionSet;
use crate::classify::ClassificationResult;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::preprocess::Preprocessor;
use crate::raster::{ColorImage, GrayImage, resize_bilinear};
use crate::segment::{Segmentation, Segmenter};
use crate::skull_strip::SkullStripper;
use crate::tumor::{BoundingBox, Contour, TumorDetector};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Preprocessed scan with the tumor contour drawn on it.
    pub annotated: ColorImage,
    /// Preprocessed scan with the segmentation painted over it.
    pub overlay: ColorImage,
    pub classification: ClassificationResult,
    pub contour: Option<Contour>,
    pub diagnostics: PipelineDiagnostics,
}

/// Diagnostic information from one pipeline run.
///
/// Contains statistics from each stage for debugging and tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Original `(width, height)` when the input was resampled.
    pub resized_from: Option<(usize, usize)>,
    /// Intensity range stretched to full scale by bias correction.
    pub bias_min_gray: u8,
    pub bias_max_gray: u8,
    pub bias_gain: f32,
    /// Otsu threshold used for skull stripping.
    pub otsu_threshold: u8,
    /// Foreground components before the largest was kept.
    pub brain_components: usize,
    /// Pixel count of the retained brain component.
    pub brain_area: usize,
    /// Nonzero pixels of the segmentation mask.
    pub mask_pixels: usize,
    /// External contours found by the detector.
    pub contours_found: usize,
    /// Area enclosed by the tumor contour, 0 without tumor.
    pub tumor_area: f64,
    pub tumor_bounds: Option<BoundingBox>,
}

#[derive(Debug, Clone)]
struct Stages {
    preprocessor: Preprocessor,
    stripper: SkullStripper,
    segmenter: Segmenter,
    detector: TumorDetector,
}

/// Preprocess -> skull strip -> segment -> detect -> classify, against one
/// shared atlas.
///
/// ```rust,ignore
/// let atlas = Arc::new(AtlasRegionSet::build(&atlas_image));
/// let pipeline = TumorPipeline::new(Config::default(), atlas)?;
/// let output = pipeline.run(&scan)?;
/// println!("{}", output.classification);
/// ```
#[derive(Debug, Clone)]
pub struct TumorPipeline {
    config: Config,
    atlas: Arc<AtlasRegionSet>,
    stages: Stages,
}

impl TumorPipeline {
    /// Validates `config` (panicking if invalid) and checks that the atlas is
    /// `working_resolution` square.
    pub fn new(config: Config, atlas: Arc<AtlasRegionSet>) -> PipelineResult<Self> {
        config.validate();

        let n = config.working_resolution;
        if atlas.dimensions() != (n, n) {
            return Err(PipelineError::AtlasResolution {
                expected: n,
                actual: atlas.dimensions(),
            });
        }

        let stages = Stages {
            preprocessor: Preprocessor::from_config(&config),
            stripper: SkullStripper::from_config(&config),
            segmenter: Segmenter::from_config(&config),
            detector: TumorDetector::from_config(&config),
        };

        Ok(Self {
            config,
            atlas,
            stages,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn atlas(&self) -> &AtlasRegionSet {
        &self.atlas
    }

    /// Runs every stage on one grayscale scan.
    pub fn run(&self, scan: &GrayImage) -> PipelineResult<PipelineOutput> {
        if scan.is_empty() {
            return Err(PipelineError::EmptyImage);
        }

        let mut diagnostics = PipelineDiagnostics::default();
        let n = self.config.working_resolution;
        let resized;
        let scan = if scan.dimensions() == (n, n) {
            scan
        } else if self.config.resize_to_working {
            log::debug!(
                "Resampling {}x{} scan to {}x{}",
                scan.width(),
                scan.height(),
                n,
                n
            );
            diagnostics.resized_from = Some(scan.dimensions());
            resized = resize_bilinear(scan, n, n);
            &resized
        } else {
            return Err(PipelineError::ResolutionMismatch {
                expected: (n, n),
                actual: scan.dimensions(),
            });
        };

        // Step 1: Denoise and stretch contrast
        let (preprocessed, correction) = self.stages.preprocessor.process_with_stats(scan);
        diagnostics.bias_min_gray = correction.min_gray;
        diagnostics.bias_max_gray = correction.max_gray;
        diagnostics.bias_gain = correction.gain;

        // Step 2: Keep the brain
        let (stripped, strip_stats) = self.stages.stripper.strip_with_stats(&preprocessed);
        diagnostics.otsu_threshold = strip_stats.threshold;
        diagnostics.brain_components = strip_stats.components;
        diagnostics.brain_area = strip_stats.retained_area;

        // Step 3: Segment bright tissue
        let Segmentation { overlay, mask } = self.stages.segmenter.segment(&stripped, &preprocessed);
        diagnostics.mask_pixels = mask.count_nonzero();

        // Step 4: Find the tumor outline
        let display = preprocessed.to_color();
        let detection = self.stages.detector.detect(&mask, &display);
        diagnostics.contours_found = detection.contour_count;
        if let Some(contour) = &detection.contour {
            diagnostics.tumor_area = contour.area();
            diagnostics.tumor_bounds = contour.bounding_box();
        }

        // Step 5: Localize it in the atlas
        let classification =
            ClassificationResult::from_detection(detection.contour.as_ref(), &self.atlas)?;
        log::info!("Classification: {}", classification);

        Ok(PipelineOutput {
            annotated: detection.annotated,
            overlay,
            classification,
            contour: detection.contour,
            diagnostics,
        })
    }

    /// Converts a color scan to gray and runs it.
    pub fn run_color(&self, scan: &ColorImage) -> PipelineResult<PipelineOutput> {
        self.run(&scan.to_gray())
    }

    /// Runs independent scans in parallel. Results keep the input order.
    pub fn run_batch(&self, scans: &[GrayImage]) -> Vec<PipelineResult<PipelineOutput>> {
        scans.par_iter().map(|scan| self.run(scan)).collect()
    }
}
