//! Synthetic scans and atlases for unit tests.

use rand::prelude::*;

use crate::atlas::Region;
use crate::raster::{GrayImage, Image};

/// Paints a filled axis-aligned rectangle (`x0..x0+w`, `y0..y0+h`).
pub fn fill_rect(image: &mut GrayImage, x0: usize, y0: usize, w: usize, h: usize, value: u8) {
    for y in y0..(y0 + h).min(image.height()) {
        for x in x0..(x0 + w).min(image.width()) {
            image[(x, y)] = value;
        }
    }
}

/// Paints a filled disc centred on `(cx, cy)`.
pub fn fill_disc(image: &mut GrayImage, cx: f32, cy: f32, radius: f32, value: u8) {
    fill_ellipse(image, cx, cy, radius, radius, value);
}

/// Paints a filled axis-aligned ellipse centred on `(cx, cy)`.
pub fn fill_ellipse(image: &mut GrayImage, cx: f32, cy: f32, rx: f32, ry: f32, value: u8) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                image[(x, y)] = value;
            }
        }
    }
}

/// Adds uniform noise in `[-amplitude, amplitude]` with a fixed seed.
pub fn add_noise(image: &mut GrayImage, amplitude: i16, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for px in image.pixels_mut() {
        let noise = rng.random_range(-amplitude..=amplitude);
        *px = (*px as i16 + noise).clamp(0, 255) as u8;
    }
}

/// A `size x size` atlas with horizontal bands:
///
/// - rows `0..size*3/16`: occipital
/// - rows `size*3/16..size*13/16`: frontal on the left half, parietal on the
///   right half
/// - rows `size*13/16..`: temporal
///
/// A small basal ganglia and corpus callosum patch sit in the top-left corner,
/// away from the scan's tumor. Every pixel carries a region value.
pub fn banded_atlas(size: usize) -> GrayImage {
    let top = size * 3 / 16;
    let bottom = size * 13 / 16;
    let mut atlas = Image::from_fn(size, size, |x, y| {
        let region = if y < top {
            Region::Occipital
        } else if y >= bottom {
            Region::Temporal
        } else if x < size / 2 {
            Region::Frontal
        } else {
            Region::Parietal
        };
        region.atlas_value()
    });
    fill_rect(&mut atlas, 0, 0, 4, 4, Region::BasalGanglia.atlas_value());
    fill_rect(&mut atlas, 4, 0, 4, 4, Region::CorpusCallosum.atlas_value());
    atlas
}

/// A `size x size` scan: black background, a mid-gray brain ellipse and a
/// bright tumor disc centred on the brain. A radius of 0 leaves out the tumor.
pub fn synthetic_scan(size: usize, tumor_radius: f32) -> GrayImage {
    let c = size as f32 / 2.0;
    let mut scan = Image::new_default(size, size);
    fill_ellipse(&mut scan, c, c, size as f32 * 0.44, size as f32 * 0.38, 100);
    if tumor_radius > 0.0 {
        fill_disc(&mut scan, c, c, tumor_radius, 230);
    }
    scan
}

/// A `size x size` atlas with basal ganglia above the middle row, parietal
/// below it and a temporal square of side `size / 4` centred in the frame.
///
/// Used as its own scan, the temporal square is the only region bright enough
/// to survive segmentation, and it straddles the other two.
pub fn lesion_atlas(size: usize) -> GrayImage {
    let mut atlas = Image::from_fn(size, size, |_, y| {
        if y < size / 2 {
            Region::BasalGanglia.atlas_value()
        } else {
            Region::Parietal.atlas_value()
        }
    });
    let side = size / 4;
    let start = (size - side) / 2;
    fill_rect(&mut atlas, start, start, side, side, Region::Temporal.atlas_value());
    atlas
}
