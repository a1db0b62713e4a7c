//! Non-local means denoising.
//!
//! For every search offset the squared differences between the image and its
//! shifted copy are accumulated into an integral image, so the distance
//! between two template patches is four lookups regardless of template size.

use crate::raster::GrayImage;

/// Weights whose exponent exceeds this contribute less than `e^-30` and are
/// skipped.
const MAX_EXPONENT: f32 = 30.0;

/// Denoises `src` with filter strength `h`.
///
/// Each output pixel is the weighted mean of the pixels in its
/// `search_window x search_window` neighbourhood, weighted by
/// `exp(-d / h^2)` where `d` is the mean squared difference of the
/// `template_window x template_window` patches around both pixels. Borders
/// replicate edge pixels.
pub fn nl_means_denoise(
    src: &GrayImage,
    h: f32,
    template_window: usize,
    search_window: usize,
) -> GrayImage {
    assert!(h > 0.0, "filter strength must be positive");
    assert!(template_window % 2 == 1, "template window must be odd");
    assert!(search_window % 2 == 1, "search window must be odd");

    if src.is_empty() {
        return src.clone();
    }

    let width = src.width();
    let height = src.height();
    let tr = template_window / 2;
    let sr = search_window / 2;
    let pad = tr + sr;
    let padded = src.padded_replicate(pad);
    let pw = padded.width();
    let px = padded.pixels();

    // Frame of pixels whose patches are compared: the image plus `tr` on
    // every side, in padded coordinates offset by `sr`.
    let fw = width + 2 * tr;
    let fh = height + 2 * tr;
    let iw = fw + 1;
    let mut integral = vec![0u64; iw * (fh + 1)];

    let patch_area = (template_window * template_window) as f32;
    let inv_h2 = 1.0 / (h * h);

    let mut value_sum = vec![0f32; width * height];
    let mut weight_sum = vec![0f32; width * height];

    let sr = sr as isize;
    for dy in -sr..=sr {
        for dx in -sr..=sr {
            fill_integral(&mut integral, px, pw, fw, fh, sr as usize, dx, dy);

            for y in 0..height {
                let top = y * iw;
                let bottom = (y + template_window) * iw;
                for x in 0..width {
                    let right = x + template_window;
                    let ssd = integral[bottom + right] + integral[top + x]
                        - integral[top + right]
                        - integral[bottom + x];
                    let exponent = ssd as f32 / patch_area * inv_h2;
                    if exponent > MAX_EXPONENT {
                        continue;
                    }
                    let weight = (-exponent).exp();

                    let sy = (y + pad) as isize + dy;
                    let sx = (x + pad) as isize + dx;
                    let value = px[sy as usize * pw + sx as usize] as f32;

                    let i = y * width + x;
                    value_sum[i] += weight * value;
                    weight_sum[i] += weight;
                }
            }
        }
    }

    let pixels = value_sum
        .iter()
        .zip(&weight_sum)
        .map(|(&v, &w)| (v / w).round().clamp(0.0, 255.0) as u8)
        .collect();

    GrayImage::new(width, height, pixels)
}

/// Integral of `(p(x, y) - p(x + dx, y + dy))^2` over the `fw x fh` frame
/// starting at padded `(sr, sr)`. Row and column 0 stay zero.
#[allow(clippy::too_many_arguments)]
fn fill_integral(
    integral: &mut [u64],
    px: &[u8],
    pw: usize,
    fw: usize,
    fh: usize,
    sr: usize,
    dx: isize,
    dy: isize,
) {
    let iw = fw + 1;
    for fy in 0..fh {
        let y = fy + sr;
        let sy = (y as isize + dy) as usize;
        let row = &px[y * pw + sr..y * pw + sr + fw];
        let shifted_start = (sy as isize * pw as isize + sr as isize + dx) as usize;
        let shifted = &px[shifted_start..shifted_start + fw];

        let mut row_sum = 0u64;
        let above = fy * iw;
        let current = (fy + 1) * iw;
        for fx in 0..fw {
            let d = row[fx] as i32 - shifted[fx] as i32;
            row_sum += (d * d) as u64;
            integral[current + fx + 1] = integral[above + fx + 1] + row_sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Image;
    use crate::testing::{add_noise, fill_rect};

    #[test]
    fn uniform_image_is_unchanged() {
        let image = Image::new_filled(12, 9, 77u8);
        assert_eq!(nl_means_denoise(&image, 10.0, 3, 7), image);
    }

    #[test]
    fn single_pixel_image() {
        let image = Image::new(1, 1, vec![200u8]);
        assert_eq!(nl_means_denoise(&image, 10.0, 7, 21), image);
    }

    #[test]
    fn reduces_noise_on_flat_areas() {
        let mut clean = Image::new_filled(32, 32, 60u8);
        fill_rect(&mut clean, 16, 0, 16, 32, 180);
        let mut noisy = clean.clone();
        add_noise(&mut noisy, 12, 7);

        let denoised = nl_means_denoise(&noisy, 10.0, 7, 21);

        let error = |image: &GrayImage| -> u64 {
            image
                .iter()
                .zip(clean.iter())
                .map(|(&a, &b)| (a as i64 - b as i64).unsigned_abs())
                .sum()
        };
        assert!(
            error(&denoised) < error(&noisy),
            "denoised error {} vs noisy error {}",
            error(&denoised),
            error(&noisy)
        );
    }

    #[test]
    fn keeps_strong_edges() {
        let mut image = Image::new_filled(24, 24, 20u8);
        fill_rect(&mut image, 12, 0, 12, 24, 220);

        let denoised = nl_means_denoise(&image, 10.0, 7, 21);

        for y in 0..24 {
            assert_eq!(denoised[(2, y)], 20);
            assert_eq!(denoised[(21, y)], 220);
            assert!(denoised[(11, y)] < 60 && denoised[(12, y)] > 180);
        }
    }
}
