//! Conversions to and from the `image` crate buffers used by loaders and
//! writers outside the pipeline.

use super::{ColorImage, GrayImage, Image, Rgb};

pub fn from_luma_image(image: &::image::GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    Image::new(width as usize, height as usize, image.as_raw().clone())
}

pub fn to_luma_image(image: &GrayImage) -> ::image::GrayImage {
    ::image::GrayImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        ::image::Luma([image[(x as usize, y as usize)]])
    })
}

pub fn from_rgb_image(image: &::image::RgbImage) -> ColorImage {
    let (width, height) = image.dimensions();
    let pixels = image
        .as_raw()
        .chunks_exact(3)
        .map(|px| Rgb([px[0], px[1], px[2]]))
        .collect();
    Image::new(width as usize, height as usize, pixels)
}

pub fn to_rgb_image(image: &ColorImage) -> ::image::RgbImage {
    ::image::RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        ::image::Rgb(image[(x as usize, y as usize)].0)
    })
}
