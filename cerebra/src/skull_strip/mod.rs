//! Brain extraction.
//!
//! The scan is binarized with Otsu's threshold and only the largest connected
//! foreground component is kept, which removes the skull ring and any
//! detached bright structures around the brain.

mod otsu;

pub use otsu::otsu_threshold;

use crate::config::{Config, Connectivity};
use crate::histogram::Histogram;
use crate::labeling::ComponentMap;
use crate::raster::GrayImage;

/// Diagnostics of one [`SkullStripper::strip_with_stats`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripStats {
    /// Otsu threshold; pixels strictly above it were foreground.
    pub threshold: u8,
    /// Number of foreground components found.
    pub components: usize,
    /// Pixel count of the retained component.
    pub retained_area: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SkullStripper {
    connectivity: Connectivity,
}

impl SkullStripper {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.connectivity)
    }

    /// Keeps the original intensities of the largest foreground component and
    /// zeros everything else. An image without foreground maps to all zeros.
    pub fn strip(&self, image: &GrayImage) -> GrayImage {
        self.strip_with_stats(image).0
    }

    pub fn strip_with_stats(&self, image: &GrayImage) -> (GrayImage, StripStats) {
        let threshold = otsu_threshold(&Histogram::from_image(image));
        let mask = image.map(|&v| v > threshold);
        let components = ComponentMap::from_mask(&mask, self.connectivity);

        let mut stats = StripStats {
            threshold,
            components: components.num_components(),
            retained_area: 0,
        };

        let Some(brain) = components.largest() else {
            log::debug!("Skull strip: no foreground above threshold {}", threshold);
            return (GrayImage::new_default(image.width(), image.height()), stats);
        };
        stats.retained_area = components.area(brain);

        let pixels = image
            .iter()
            .zip(components.labels().iter())
            .map(|(&v, &label)| if label == brain { v } else { 0 })
            .collect();

        log::debug!(
            "Skull strip: threshold {}, kept 1 of {} components ({} px)",
            threshold,
            stats.components,
            stats.retained_area
        );

        (
            GrayImage::new(image.width(), image.height(), pixels),
            stats,
        )
    }
}
