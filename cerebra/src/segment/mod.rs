//! Intensity segmentation of the stripped brain and its color overlay.


use crate::config::Config;
use crate::raster::{ColorImage, GrayImage, Rgb};

/// Keeps pixels at or above `cutoff` and zeros the rest.
pub fn to_zero_threshold(image: &GrayImage, cutoff: u8) -> GrayImage {
    image.map(|&v| if v >= cutoff { v } else { 0 })
}

/// Output of [`Segmenter::segment`].
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Display image with segmented pixels painted in the accent color.
    pub overlay: ColorImage,
    /// Segmented intensities, 0 elsewhere.
    pub mask: GrayImage,
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    cutoff: u8,
    accent: Rgb,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Segmenter {
    pub fn new(cutoff: u8, accent: Rgb) -> Self {
        Self { cutoff, accent }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.segment_cutoff, config.overlay_accent)
    }

    /// Thresholds `stripped` and paints the result over `display`.
    ///
    /// Each segmented pixel of the overlay becomes the accent color scaled by
    /// the pixel's intensity; all other pixels show `display` in gray.
    pub fn segment(&self, stripped: &GrayImage, display: &GrayImage) -> Segmentation {
        assert!(
            stripped.same_dimensions(display),
            "stripped {:?} and display {:?} images must share dimensions",
            stripped.dimensions(),
            display.dimensions()
        );

        let mask = to_zero_threshold(stripped, self.cutoff);

        let mut overlay = display.to_color();
        for (dst, &value) in overlay.pixels_mut().iter_mut().zip(mask.iter()) {
            if value != 0 {
                *dst = self.accent.scaled_by(value);
            }
        }

        log::debug!(
            "Segmented {} px at cutoff {}",
            mask.count_nonzero(),
            self.cutoff
        );

        Segmentation { overlay, mask }
    }
}
