use super::{GrayImage, Image};

/// Resamples `src` to `width x height` with bilinear interpolation.
///
/// Pixel centres are aligned (`src = (dst + 0.5) * scale - 0.5`) and samples
/// outside the source are clamped to its edge. Returns a plain copy when the
/// size already matches.
pub fn resize_bilinear(src: &GrayImage, width: usize, height: usize) -> GrayImage {
    assert!(
        width > 0 && height > 0,
        "target size must be non-zero, got {}x{}",
        width,
        height
    );
    assert!(!src.is_empty(), "cannot resample an empty image");

    if src.dimensions() == (width, height) {
        return src.clone();
    }

    let scale_x = src.width() as f32 / width as f32;
    let scale_y = src.height() as f32 / height as f32;
    let max_x = (src.width() - 1) as f32;
    let max_y = (src.height() - 1) as f32;

    Image::from_fn(width, height, |x, y| {
        let fx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
        let fy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);

        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(src.width() - 1);
        let y1 = (y0 + 1).min(src.height() - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let sample = |x: usize, y: usize| src[(x, y)] as f32;
        let top = sample(x0, y0) * (1.0 - tx) + sample(x1, y0) * tx;
        let bottom = sample(x0, y1) * (1.0 - tx) + sample(x1, y1) * tx;

        (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8
    })
}
