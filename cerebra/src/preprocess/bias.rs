//! Histogram-based contrast stretching.

use crate::histogram::{BINS, Histogram};
use crate::raster::GrayImage;

/// A linear intensity map `out = clamp(round(gain * in + bias))` that
/// stretches `[min_gray, max_gray]` over the full 8-bit range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasCorrection {
    pub min_gray: u8,
    pub max_gray: u8,
    pub gain: f32,
    pub bias: f32,
}

impl BiasCorrection {
    pub const IDENTITY: Self = Self {
        min_gray: 0,
        max_gray: 255,
        gain: 1.0,
        bias: 0.0,
    };

    /// Derives the stretch from `hist`, clipping `clip_percent / 2` percent of
    /// the pixel mass at each end.
    ///
    /// Falls back to [`Self::IDENTITY`] when the clipped range collapses, e.g.
    /// for a uniform image.
    pub fn from_histogram(hist: &Histogram, clip_percent: f32) -> Self {
        let total = hist.total();
        if total == 0 {
            return Self::IDENTITY;
        }

        let cumulative = hist.cumulative();
        let clip = total as f64 * clip_percent as f64 / 100.0 / 2.0;

        let min_gray = cumulative
            .iter()
            .position(|&c| c as f64 >= clip)
            .unwrap_or(BINS - 1);
        let max_gray = cumulative
            .iter()
            .rposition(|&c| (c as f64) < total as f64 - clip)
            .unwrap_or(0);

        if max_gray <= min_gray {
            log::debug!(
                "Degenerate intensity range [{}, {}], skipping bias correction",
                min_gray,
                max_gray
            );
            return Self::IDENTITY;
        }

        let gain = 255.0 / (max_gray - min_gray) as f32;
        Self {
            min_gray: min_gray as u8,
            max_gray: max_gray as u8,
            gain,
            bias: -(min_gray as f32) * gain,
        }
    }

    pub fn from_image(image: &GrayImage, clip_percent: f32) -> Self {
        Self::from_histogram(&Histogram::from_image(image), clip_percent)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.gain == 1.0 && self.bias == 0.0
    }

    /// Lookup table of the mapping for every input level.
    pub fn lut(&self) -> [u8; BINS] {
        let mut lut = [0u8; BINS];
        for (level, out) in lut.iter_mut().enumerate() {
            *out = (self.gain * level as f32 + self.bias)
                .round()
                .clamp(0.0, 255.0) as u8;
        }
        lut
    }

    pub fn apply(&self, image: &GrayImage) -> GrayImage {
        let lut = self.lut();
        image.map(|&v| lut[v as usize])
    }
}
