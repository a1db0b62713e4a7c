//! Grayscale morphology with rectangular structuring elements.
//!
//! Windows are clipped at the image border, so pixels outside the frame never
//! contribute to a minimum or maximum.

use serde::{Deserialize, Serialize};

use crate::raster::GrayImage;

/// A filled rectangular structuring element anchored at `(width / 2, height / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kernel {
    pub width: usize,
    pub height: usize,
}

impl Kernel {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// `(x, y)` of the anchor inside the kernel.
    #[inline]
    pub const fn anchor(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    pub fn validate(&self) {
        assert!(
            self.width > 0 && self.height > 0,
            "kernel must be at least 1x1, got {}x{}",
            self.width,
            self.height
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Min,
    Max,
}

impl Op {
    #[inline]
    fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Op::Min => a.min(b),
            Op::Max => a.max(b),
        }
    }
}

/// Dilation: each pixel becomes the maximum over the kernel reflected about
/// its anchor, i.e. over `[x - (w - 1 - ax), x + ax]` horizontally.
pub fn dilate(src: &GrayImage, kernel: Kernel, iterations: usize) -> GrayImage {
    let (ax, ay) = kernel.anchor();
    let before = (kernel.width - 1 - ax, kernel.height - 1 - ay);
    let after = (ax, ay);
    iterate(src, iterations, |image| {
        rect_filter(image, before, after, Op::Max)
    })
}

/// Erosion: each pixel becomes the minimum over the kernel placed at its
/// anchor, i.e. over `[x - ax, x + (w - 1 - ax)]` horizontally.
pub fn erode(src: &GrayImage, kernel: Kernel, iterations: usize) -> GrayImage {
    let (ax, ay) = kernel.anchor();
    let before = (ax, ay);
    let after = (kernel.width - 1 - ax, kernel.height - 1 - ay);
    iterate(src, iterations, |image| {
        rect_filter(image, before, after, Op::Min)
    })
}

/// Dilation followed by erosion with the same kernel.
pub fn close(src: &GrayImage, kernel: Kernel) -> GrayImage {
    erode(&dilate(src, kernel, 1), kernel, 1)
}

fn iterate(
    src: &GrayImage,
    iterations: usize,
    step: impl Fn(&GrayImage) -> GrayImage,
) -> GrayImage {
    let mut image = src.clone();
    for _ in 0..iterations {
        image = step(&image);
    }
    image
}

/// Separable min/max over the window `[x - before.0, x + after.0]` x
/// `[y - before.1, y + after.1]`, clipped to the frame.
fn rect_filter(
    src: &GrayImage,
    before: (usize, usize),
    after: (usize, usize),
    op: Op,
) -> GrayImage {
    let width = src.width();
    let height = src.height();
    if src.is_empty() {
        return src.clone();
    }

    let mut rows = src.clone();
    if before.0 + after.0 > 0 {
        for y in 0..height {
            let row = src.row(y);
            let dst = &mut rows.pixels_mut()[y * width..(y + 1) * width];
            for (x, out) in dst.iter_mut().enumerate() {
                let lo = x.saturating_sub(before.0);
                let hi = (x + after.0).min(width - 1);
                *out = row[lo..=hi]
                    .iter()
                    .copied()
                    .reduce(|a, b| op.apply(a, b))
                    .unwrap_or(row[x]);
            }
        }
    }

    if before.1 + after.1 == 0 {
        return rows;
    }

    GrayImage::from_fn(width, height, |x, y| {
        let lo = y.saturating_sub(before.1);
        let hi = (y + after.1).min(height - 1);
        (lo..=hi)
            .map(|yy| rows[(x, yy)])
            .reduce(|a, b| op.apply(a, b))
            .unwrap_or(rows[(x, y)])
    })
}
