//! Noise reduction and contrast normalization.

mod bias;
mod nl_means;

pub use bias::BiasCorrection;
pub use nl_means::nl_means_denoise;

use crate::config::Config;
use crate::raster::GrayImage;

/// Denoises a scan with non-local means, then stretches its intensity range.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    strength: f32,
    template_window: usize,
    search_window: usize,
    clip_percent: f32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Preprocessor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            strength: config.denoise_strength,
            template_window: config.denoise_template_window,
            search_window: config.denoise_search_window,
            clip_percent: config.bias_clip_percent,
        }
    }

    pub fn process(&self, image: &GrayImage) -> GrayImage {
        self.process_with_stats(image).0
    }

    /// Like [`Self::process`], also returning the applied stretch.
    pub fn process_with_stats(&self, image: &GrayImage) -> (GrayImage, BiasCorrection) {
        let denoised = nl_means_denoise(
            image,
            self.strength,
            self.template_window,
            self.search_window,
        );

        let correction = BiasCorrection::from_image(&denoised, self.clip_percent);
        log::debug!(
            "Bias correction: range [{}, {}], gain {:.3}",
            correction.min_gray,
            correction.max_gray,
            correction.gain
        );

        (correction.apply(&denoised), correction)
    }
}
