#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};

/// Encode an RGB buffer in the given container format.
pub fn encode_as(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut buf, format)
        .expect("in-memory encode");
    buf.into_inner()
}

/// PNG bytes of an image built pixel by pixel.
pub fn png_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    encode_as(&RgbImage::from_fn(width, height, |x, y| Rgb(f(x, y))), ImageFormat::Png)
}

/// PNG bytes of a single-colour image.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    png_from_fn(width, height, |_, _| rgb)
}

/// PNG bytes of `background` with a filled `size`x`size` square at (x0, y0).
pub fn square_png(
    width: u32,
    height: u32,
    background: [u8; 3],
    fill: [u8; 3],
    x0: u32,
    y0: u32,
    size: u32,
) -> Vec<u8> {
    png_from_fn(width, height, |x, y| {
        if (x0..x0 + size).contains(&x) && (y0..y0 + size).contains(&y) {
            fill
        } else {
            background
        }
    })
}

/// PNG bytes of a smooth diagonal colour ramp, useful as a textured scene.
pub fn ramp_png(width: u32, height: u32) -> Vec<u8> {
    png_from_fn(width, height, |x, y| {
        [
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ]
    })
}

/// RGBA PNG with a constant alpha, for alpha-dropping checks.
pub fn rgba_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("in-memory encode");
    buf.into_inner()
}
