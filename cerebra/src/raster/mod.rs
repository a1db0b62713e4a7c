//! Pixel containers shared by every pipeline stage.
//!
//! [`Image`] is a row-major 2-D grid indexed by `(x, y)`. The two concrete
//! flavours used by the pipeline are [`GrayImage`] (8-bit single channel) and
//! [`ColorImage`] ([`Rgb`] triples). Region and contour coordinates use
//! [`Coord`], which is `(row, col)` like the atlas.

mod interop;
mod resample;

use std::ops::{Index, IndexMut};
use std::slice;

use serde::{Deserialize, Serialize};

pub use interop::{from_luma_image, from_rgb_image, to_luma_image, to_rgb_image};
pub use resample::resize_bilinear;

/// Single-channel 8-bit image.
pub type GrayImage = Image<u8>;

/// Three-channel 8-bit image in RGB order.
pub type ColorImage = Image<Rgb>;

// ============================================================================
// Coord
// ============================================================================

/// A pixel position as `(row, col)`.
///
/// Ordering is row-major, so sorting coordinates yields raster order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour at a signed offset, or `None` when it would leave the
    /// `width x height` frame.
    #[inline]
    pub fn offset(self, d_row: isize, d_col: isize, width: usize, height: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < height && col < width).then_some(Self { row, col })
    }
}

impl From<(usize, usize)> for Coord {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

// ============================================================================
// Rgb
// ============================================================================

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Self = Self([0, 0, 0]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub const fn gray(value: u8) -> Self {
        Self([value, value, value])
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// Luma with ITU-R BT.601 weights, rounded to the nearest level.
    #[inline]
    pub fn luma(self) -> u8 {
        let [r, g, b] = self.0;
        let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Each channel scaled by `value / 255`, rounded up.
    ///
    /// Integer arithmetic keeps `ceil` exact: full intensity returns `self`
    /// unchanged and zero returns black.
    #[inline]
    pub fn scaled_by(self, value: u8) -> Self {
        let scale = |channel: u8| ((channel as u32 * value as u32).div_ceil(255)) as u8;
        Self([scale(self.0[0]), scale(self.0[1]), scale(self.0[2])])
    }
}

// ============================================================================
// Image
// ============================================================================

/// A row-major 2-D grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Image<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Builds an image by evaluating `f(x, y)` in raster order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn same_dimensions<U>(&self, other: &Image<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.pixels[self.index_of(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index_of(x, y);
        &mut self.pixels[idx]
    }

    /// Pixel at a signed position, `None` outside the frame.
    #[inline]
    pub fn checked_get(&self, x: isize, y: isize) -> Option<&T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(&self.pixels[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn rows(&self) -> slice::ChunksExact<'_, T> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<T> {
        self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    /// Applies `f` to every pixel, keeping the geometry.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Image<U> {
        Image {
            pixels: self.pixels.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T: Default + Clone> Image<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, T::default())
    }
}

impl<T: Copy> Image<T> {
    /// Pixel at a signed position with coordinates clamped into the frame
    /// (replicated border).
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.pixels[y * self.width + x]
    }

    /// Copy enlarged by `pad` pixels on every side, replicating edge pixels.
    pub fn padded_replicate(&self, pad: usize) -> Self {
        assert!(!self.is_empty(), "cannot pad an empty image");
        let pad = pad as isize;
        Self::from_fn(
            self.width + 2 * pad as usize,
            self.height + 2 * pad as usize,
            |x, y| self.get_clamped(x as isize - pad, y as isize - pad),
        )
    }
}

impl Image<u8> {
    /// Replicates the gray level into all three channels.
    pub fn to_color(&self) -> ColorImage {
        self.map(|&v| Rgb::gray(v))
    }

    pub fn count_nonzero(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != 0).count()
    }
}

impl Image<Rgb> {
    /// BT.601 luma conversion.
    pub fn to_gray(&self) -> GrayImage {
        self.map(|&px| px.luma())
    }
}

impl<T> Index<(usize, usize)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<Coord> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, coord: Coord) -> &Self::Output {
        &self.pixels[coord.row * self.width + coord.col]
    }
}

impl<T> IndexMut<Coord> for Image<T> {
    #[inline]
    fn index_mut(&mut self, coord: Coord) -> &mut Self::Output {
        &mut self.pixels[coord.row * self.width + coord.col]
    }
}
