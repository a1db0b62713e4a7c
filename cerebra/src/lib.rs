//! Cerebra - brain scan tumor localization.
//!
//! This library takes a 2-D grayscale brain scan through a fixed sequence of
//! stages and reports which anatomical regions of a reference atlas the
//! detected tumor overlaps:
//! - Preprocessing (non-local means denoising, contrast stretching)
//! - Skull stripping (Otsu threshold, largest connected component)
//! - Segmentation (to-zero threshold, color overlay)
//! - Tumor detection (morphology, Canny edges, external contours)
//! - Region classification against the atlas
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use cerebra::{AtlasRegionSet, Config, TumorPipeline, from_luma_image};
//!
//! let atlas = from_luma_image(&image::open("atlas.png")?.to_luma8());
//! let atlas = Arc::new(AtlasRegionSet::build(&atlas));
//! let pipeline = TumorPipeline::new(Config::default(), atlas)?;
//!
//! let scan = from_luma_image(&image::open("scan.jpg")?.to_luma8());
//! let output = pipeline.run(&scan)?;
//! println!("{}", output.classification);
//! ```

pub mod atlas;
pub mod classify;
pub mod config;
pub mod error;
pub mod histogram;
pub(crate) mod labeling;
pub mod pipeline;
pub mod preprocess;
pub mod raster;
pub mod segment;
pub mod skull_strip;
pub mod tumor;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Core image types
// ============================================================================

pub use raster::{
    ColorImage, Coord, GrayImage, Image, Rgb, from_luma_image, from_rgb_image, resize_bilinear,
    to_luma_image, to_rgb_image,
};

// ============================================================================
// Atlas and classification
// ============================================================================

pub use atlas::{AtlasRegionSet, REGION_COUNT, Region};
pub use classify::{ClassificationResult, classify};

// ============================================================================
// Stages
// ============================================================================

pub use preprocess::{BiasCorrection, Preprocessor};
pub use segment::{Segmentation, Segmenter};
pub use skull_strip::{SkullStripper, StripStats};
pub use tumor::{BoundingBox, Contour, Detection, Kernel, TumorDetector};

// ============================================================================
// Pipeline
// ============================================================================

pub use config::{Config, Connectivity, ContourApproximation};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{PipelineDiagnostics, PipelineOutput, TumorPipeline};
