//! 256-bin intensity histograms of 8-bit images.

use crate::raster::GrayImage;

/// Number of bins, one per 8-bit intensity level.
pub const BINS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; BINS],
}

impl Histogram {
    pub fn from_pixels(pixels: &[u8]) -> Self {
        let mut counts = [0u64; BINS];
        for &p in pixels {
            counts[p as usize] += 1;
        }
        Self { counts }
    }

    pub fn from_image(image: &GrayImage) -> Self {
        Self::from_pixels(image.pixels())
    }

    #[inline]
    pub fn counts(&self) -> &[u64; BINS] {
        &self.counts
    }

    #[inline]
    pub fn count(&self, level: u8) -> u64 {
        self.counts[level as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Running sum of the counts; the last entry equals [`Self::total`].
    pub fn cumulative(&self) -> [u64; BINS] {
        let mut cumulative = [0u64; BINS];
        let mut acc = 0u64;
        for (dst, &count) in cumulative.iter_mut().zip(&self.counts) {
            acc += count;
            *dst = acc;
        }
        cumulative
    }

    /// Number of distinct levels that occur at least once.
    pub fn occupied_bins(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Image;

    #[test]
    fn counts_every_pixel_once() {
        let image = Image::new(4, 1, vec![0u8, 7, 7, 255]);
        let hist = Histogram::from_image(&image);

        assert_eq!(hist.count(0), 1);
        assert_eq!(hist.count(7), 2);
        assert_eq!(hist.count(255), 1);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.occupied_bins(), 3);
    }

    #[test]
    fn cumulative_is_monotonic_and_ends_at_total() {
        let pixels: Vec<u8> = (0..=255u8).chain([10, 10, 200]).collect();
        let hist = Histogram::from_pixels(&pixels);
        let cumulative = hist.cumulative();

        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cumulative[BINS - 1], hist.total());
        assert_eq!(cumulative[9], 10);
        assert_eq!(cumulative[10], 13);
    }

    #[test]
    fn empty_histogram() {
        let hist = Histogram::from_pixels(&[]);

        assert_eq!(hist.total(), 0);
        assert_eq!(hist.occupied_bins(), 0);
        assert!(hist.cumulative().iter().all(|&c| c == 0));
    }
}
