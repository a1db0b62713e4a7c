//! Tumor candidate detection.
//!
//! The segmentation mask is cleaned with grayscale morphology, its edges are
//! traced into external contours, and the contour enclosing the largest area
//! is taken as the tumor and drawn onto the color image.

mod canny;
mod contour;
mod draw;
mod morphology;

pub use canny::{CannyParams, EDGE, canny, sobel};
pub use contour::{BoundingBox, Contour, find_external_contours};
pub use draw::{draw_contour, draw_line};
pub use morphology::{Kernel, close, dilate, erode};

use crate::config::{Config, ContourApproximation};
use crate::raster::{ColorImage, GrayImage, Rgb};

/// Output of [`TumorDetector::detect`].
#[derive(Debug, Clone)]
pub struct Detection {
    /// Copy of the color image with the tumor contour drawn on it, or an
    /// unmodified copy when no contour was found.
    pub annotated: ColorImage,
    pub contour: Option<Contour>,
    /// Number of external contours the largest was picked from.
    pub contour_count: usize,
}

#[derive(Debug, Clone)]
pub struct TumorDetector {
    closing_kernel: Kernel,
    cleanup_kernel: Kernel,
    erode_iterations: usize,
    dilate_iterations: usize,
    canny: CannyParams,
    approximation: ContourApproximation,
    highlight: Rgb,
    thickness: usize,
}

impl Default for TumorDetector {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl TumorDetector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            closing_kernel: config.closing_kernel,
            cleanup_kernel: config.cleanup_kernel,
            erode_iterations: config.erode_iterations,
            dilate_iterations: config.dilate_iterations,
            canny: CannyParams {
                low: config.canny_low,
                high: config.canny_high,
                aperture: config.canny_aperture,
            },
            approximation: config.contour_approximation,
            highlight: config.highlight_color,
            thickness: config.highlight_thickness,
        }
    }

    /// Closes small gaps, then removes structures thinner than the cleanup
    /// passes while restoring the extent of what survives.
    pub fn clean_mask(&self, mask: &GrayImage) -> GrayImage {
        let closed = close(mask, self.closing_kernel);
        let eroded = erode(&closed, self.cleanup_kernel, self.erode_iterations);
        dilate(&eroded, self.cleanup_kernel, self.dilate_iterations)
    }

    /// External contours of the cleaned mask's edges.
    pub fn contours(&self, mask: &GrayImage) -> Vec<Contour> {
        let cleaned = self.clean_mask(mask);
        let edges = canny(&cleaned, self.canny);
        find_external_contours(&edges, self.approximation)
    }

    pub fn detect(&self, mask: &GrayImage, color: &ColorImage) -> Detection {
        assert!(
            mask.same_dimensions(color),
            "mask {:?} and color {:?} images must share dimensions",
            mask.dimensions(),
            color.dimensions()
        );

        let mut contours = self.contours(mask);
        let contour_count = contours.len();
        let mut annotated = color.clone();

        let Some(index) = select_largest(&contours) else {
            log::debug!("No tumor contour found");
            return Detection {
                annotated,
                contour: None,
                contour_count,
            };
        };

        let contour = contours.swap_remove(index);
        log::debug!(
            "Tumor contour: {} points, area {:.1}, picked from {} contours",
            contour.len(),
            contour.area(),
            contour_count
        );
        draw_contour(&mut annotated, &contour, self.thickness, self.highlight);

        Detection {
            annotated,
            contour: Some(contour),
            contour_count,
        }
    }
}

/// Index of the contour with the largest area; the first wins a tie.
pub fn select_largest(contours: &[Contour]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, contour) in contours.iter().enumerate() {
        let area = contour.area();
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}
