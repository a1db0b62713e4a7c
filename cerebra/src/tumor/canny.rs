//! Canny edge detection.
//!
//! Sobel gradients with reflect-101 borders, L1 magnitude, four-direction
//! non-maximum suppression and hysteresis with 8-connected growth.

use crate::raster::{GrayImage, Image};

/// Value of edge pixels in the output.
pub const EDGE: u8 = 255;

const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Hysteresis thresholds and Sobel aperture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    pub low: f32,
    pub high: f32,
    /// 3, 5 or 7.
    pub aperture: usize,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: 20.0,
            high: 60.0,
            aperture: 3,
        }
    }
}

/// Smoothing and derivative taps of the separable Sobel operator.
fn sobel_taps(aperture: usize) -> (&'static [i32], &'static [i32]) {
    match aperture {
        3 => (&[1, 2, 1], &[-1, 0, 1]),
        5 => (&[1, 4, 6, 4, 1], &[-1, -2, 0, 2, 1]),
        7 => (&[1, 6, 15, 20, 15, 6, 1], &[-1, -4, -5, 0, 5, 4, 1]),
        _ => panic!("Sobel aperture must be 3, 5 or 7, got {aperture}"),
    }
}

/// Index `i` mirrored into `0..n` without repeating the edge sample
/// (`dcb|abcd|cba`).
#[inline]
fn reflect_101(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Correlates every row of `src` with `taps`.
fn correlate_rows(src: &Image<i32>, taps: &[i32]) -> Image<i32> {
    let r = (taps.len() / 2) as isize;
    let width = src.width();
    Image::from_fn(width, src.height(), |x, y| {
        let row = src.row(y);
        taps.iter()
            .enumerate()
            .map(|(k, &t)| t * row[reflect_101(x as isize + k as isize - r, width)])
            .sum()
    })
}

/// Correlates every column of `src` with `taps`.
fn correlate_cols(src: &Image<i32>, taps: &[i32]) -> Image<i32> {
    let r = (taps.len() / 2) as isize;
    let height = src.height();
    Image::from_fn(src.width(), height, |x, y| {
        taps.iter()
            .enumerate()
            .map(|(k, &t)| t * src[(x, reflect_101(y as isize + k as isize - r, height))])
            .sum()
    })
}

/// Horizontal and vertical Sobel derivatives.
pub fn sobel(src: &GrayImage, aperture: usize) -> (Image<i32>, Image<i32>) {
    let (smooth, deriv) = sobel_taps(aperture);
    let src = src.map(|&v| v as i32);
    let gx = correlate_cols(&correlate_rows(&src, deriv), smooth);
    let gy = correlate_cols(&correlate_rows(&src, smooth), deriv);
    (gx, gy)
}

/// Binary edge map of `src`: [`EDGE`] on edges, 0 elsewhere.
pub fn canny(src: &GrayImage, params: CannyParams) -> GrayImage {
    let width = src.width();
    let height = src.height();
    if src.is_empty() {
        return src.clone();
    }

    let (gx, gy) = sobel(src, params.aperture);
    let magnitude = Image::from_fn(width, height, |x, y| {
        (gx[(x, y)].abs() + gy[(x, y)].abs()) as f32
    });
    let mag_at = |x: isize, y: isize| magnitude.checked_get(x, y).copied().unwrap_or(0.0);

    // Non-maximum suppression: candidates survive along the gradient only.
    let mut candidate = Image::new_filled(width, height, false);
    let mut stack = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let m = magnitude[(x, y)];
            if m <= params.low {
                continue;
            }

            let dx = gx[(x, y)];
            let dy = gy[(x, y)];
            let ax = dx.abs() as f32;
            let ay = dy.abs() as f32;
            let (xi, yi) = (x as isize, y as isize);

            let is_max = if ay < ax * TAN_22_5 {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };

            if is_max {
                candidate[(x, y)] = true;
                if m > params.high {
                    stack.push((x, y));
                }
            }
        }
    }

    // Hysteresis: grow from strong pixels through 8-connected candidates.
    let mut edges = GrayImage::new_default(width, height);
    for &(x, y) in &stack {
        edges[(x, y)] = EDGE;
    }
    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                if candidate[(nx, ny)] && edges[(nx, ny)] == 0 {
                    edges[(nx, ny)] = EDGE;
                    stack.push((nx, ny));
                }
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fill_disc, fill_rect};

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(-3, 1), 0);
    }

    #[test]
    fn sobel_of_ramp_is_constant() {
        let image = Image::from_fn(8, 6, |x, _| (x * 10) as u8);
        let (gx, gy) = sobel(&image, 3);

        // Interior: (f(x+1) - f(x-1)) * (1 + 2 + 1).
        assert_eq!(gx[(3, 2)], 80);
        assert_eq!(gy[(3, 2)], 0);
        // Reflect-101 flattens the derivative at the border.
        assert_eq!(gx[(0, 2)], 0);
    }

    #[test]
    fn flat_image_has_no_edges() {
        let image = Image::new_filled(16, 16, 140u8);
        for aperture in [3, 5, 7] {
            let params = CannyParams {
                aperture,
                ..Default::default()
            };
            assert_eq!(canny(&image, params).count_nonzero(), 0);
        }
    }

    #[test]
    fn step_edge_gives_single_line() {
        let mut image = Image::new_default(20, 12);
        fill_rect(&mut image, 10, 0, 10, 12, 200);

        let edges = canny(&image, CannyParams::default());

        for y in 0..12 {
            let row = edges.row(y);
            assert_eq!(row.iter().filter(|&&v| v == EDGE).count(), 1, "row {y}");
            assert_eq!(row[9], EDGE);
        }
    }

    #[test]
    fn weak_step_below_high_threshold_is_dropped() {
        // Gradient 4 * 10 = 40: above low but never above high.
        let mut image = Image::new_filled(20, 12, 50u8);
        fill_rect(&mut image, 10, 0, 10, 12, 60);

        assert_eq!(canny(&image, CannyParams::default()).count_nonzero(), 0);
    }

    #[test]
    fn disc_outline_is_closed_and_thin() {
        let mut image = Image::new_default(40, 40);
        fill_disc(&mut image, 20.0, 20.0, 10.0, 255);

        let edges = canny(&image, CannyParams::default());

        assert!(edges.count_nonzero() > 40);
        // Every edge pixel lies within a pixel of the disc boundary.
        for y in 0..40 {
            for x in 0..40 {
                if edges[(x, y)] == EDGE {
                    let r = ((x as f32 - 20.0).powi(2) + (y as f32 - 20.0).powi(2)).sqrt();
                    assert!((8.5..=11.5).contains(&r), "({x}, {y}) at r = {r}");
                }
            }
        }
        assert_eq!(edges[(20, 20)], 0);
    }
}
