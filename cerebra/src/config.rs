//! Configuration types for the tumor pipeline.
//!
//! This module defines the flat [`Config`] struct and the enums it uses. All
//! parameters are grouped by comments into per-stage sections and every tuned
//! constant of the pipeline lives here under a name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::raster::Rgb;
use crate::tumor::Kernel;

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity for connected component labeling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Connectivity {
    /// Only horizontal and vertical neighbors are connected.
    Four,
    /// Diagonal neighbors are connected as well.
    #[default]
    Eight,
}

/// How many boundary points a traced contour keeps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContourApproximation {
    /// Every boundary pixel in traversal order.
    None,
    /// Only the end points of horizontal, vertical and diagonal segments.
    #[default]
    Simple,
}

// ============================================================================
// Config
// ============================================================================

/// Pipeline configuration.
///
/// ```rust,ignore
/// let mut config = Config::default();
/// config.segment_cutoff = 140;
/// config.validate();
/// config.save("cerebra.yaml")?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -- Input --
    /// Side length of the square frame every stage works in. Must equal the
    /// atlas resolution.
    pub working_resolution: usize,
    /// Resample inputs of another size to the working resolution. When off,
    /// such inputs are rejected.
    pub resize_to_working: bool,

    // -- Preprocessing --
    /// Non-local means filter strength `h`. Larger removes more noise and
    /// more detail.
    pub denoise_strength: f32,
    /// Side of the patch compared around each pixel. Odd.
    pub denoise_template_window: usize,
    /// Side of the area searched for similar patches. Odd.
    pub denoise_search_window: usize,
    /// Percentage of histogram mass clipped before stretching, split evenly
    /// between the dark and bright ends.
    pub bias_clip_percent: f32,

    // -- Skull stripping --
    pub connectivity: Connectivity,

    // -- Segmentation --
    /// Intensities below this become 0 in the segmentation mask.
    pub segment_cutoff: u8,
    /// Color of segmented pixels in the overlay, scaled by their intensity.
    pub overlay_accent: Rgb,

    // -- Tumor detection --
    /// Kernel of the closing that bridges small gaps in the mask.
    pub closing_kernel: Kernel,
    /// Kernel of the erosion/dilation cleanup passes.
    pub cleanup_kernel: Kernel,
    pub erode_iterations: usize,
    pub dilate_iterations: usize,
    /// Canny hysteresis thresholds on the L1 gradient magnitude.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Sobel aperture: 3, 5 or 7.
    pub canny_aperture: usize,
    pub contour_approximation: ContourApproximation,
    pub highlight_color: Rgb,
    /// Side of the square brush the tumor contour is drawn with.
    pub highlight_thickness: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Input
            working_resolution: 600,
            resize_to_working: true,

            // Preprocessing
            denoise_strength: 10.0,
            denoise_template_window: 7,
            denoise_search_window: 21,
            bias_clip_percent: 3.0,

            // Skull stripping
            connectivity: Connectivity::Eight,

            // Segmentation
            segment_cutoff: 125,
            overlay_accent: Rgb::RED,

            // Tumor detection
            closing_kernel: Kernel::new(10, 5),
            cleanup_kernel: Kernel::new(3, 3),
            erode_iterations: 15,
            dilate_iterations: 15,
            canny_low: 20.0,
            canny_high: 60.0,
            canny_aperture: 3,
            contour_approximation: ContourApproximation::Simple,
            highlight_color: Rgb::GREEN,
            highlight_thickness: 1,
        }
    }
}

impl Config {
    /// Validate the configuration, panicking if invalid.
    pub fn validate(&self) {
        // Input
        assert!(
            self.working_resolution > 0,
            "working_resolution must be positive"
        );

        // Preprocessing
        assert!(
            self.denoise_strength > 0.0,
            "denoise_strength must be positive, got {}",
            self.denoise_strength
        );
        assert!(
            self.denoise_template_window % 2 == 1,
            "denoise_template_window must be odd, got {}",
            self.denoise_template_window
        );
        assert!(
            self.denoise_search_window % 2 == 1,
            "denoise_search_window must be odd, got {}",
            self.denoise_search_window
        );
        assert!(
            (0.0..100.0).contains(&self.bias_clip_percent),
            "bias_clip_percent must be in [0, 100), got {}",
            self.bias_clip_percent
        );

        // Tumor detection
        self.closing_kernel.validate();
        self.cleanup_kernel.validate();
        assert!(
            self.canny_low >= 0.0 && self.canny_low <= self.canny_high,
            "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
            self.canny_low,
            self.canny_high
        );
        assert!(
            matches!(self.canny_aperture, 3 | 5 | 7),
            "canny_aperture must be 3, 5 or 7, got {}",
            self.canny_aperture
        );
        assert!(
            self.highlight_thickness > 0,
            "highlight_thickness must be positive"
        );
    }

    /// Loads a config from a YAML or JSON file, chosen by extension.
    /// Missing fields take their default value.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        common::read_file(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        common::write_file(self, path)
    }
}
