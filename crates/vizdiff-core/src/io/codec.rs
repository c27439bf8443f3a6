use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageFormat, RgbImage};
use serde::Serialize;

use crate::error::{DiffError, Result};
use crate::grid::{Dimensions, PixelGrid};

/// Formats accepted as comparison input.
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Format and size of an encoded image, read without decoding pixels.
#[derive(Clone, Debug, Serialize)]
pub struct ImageInfo {
    pub format: &'static str,
    pub dimensions: Dimensions,
}

/// Short lowercase name of a supported format.
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::WebP => "webp",
        _ => "other",
    }
}

/// Identify the format from the leading magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat> {
    let format = image::guess_format(bytes)
        .map_err(|_| DiffError::InvalidFormat("unrecognized image signature".into()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(DiffError::InvalidFormat(format!("{format:?}")));
    }
    Ok(format)
}

/// Read format and dimensions from the header only.
pub fn probe(bytes: &[u8]) -> Result<ImageInfo> {
    let format = sniff_format(bytes)?;
    let (width, height) = image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(map_decode_error)?;
    Ok(ImageInfo {
        format: format_name(format),
        dimensions: Dimensions::new(width, height),
    })
}

/// Decode an encoded image into an RGB grid.
///
/// Alpha is dropped; greyscale and palette images are expanded to RGB.
/// 8-bit sources map exactly to `level / 255`; deeper sources keep their
/// precision as floats.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    let format = sniff_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format).map_err(map_decode_error)?;

    let dims = Dimensions::new(img.width(), img.height());
    if dims.is_degenerate() {
        return Err(DiffError::InvalidImage {
            width: dims.width,
            height: dims.height,
        });
    }

    let grid = match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => PixelGrid::from_rgb8(&img.to_rgb8()),
        _ => PixelGrid::from_rgb32f(&img.to_rgb32f()),
    };
    Ok(grid)
}

/// Encode a grid as an 8-bit RGB PNG.
///
/// Compression and filter settings are fixed, so the same grid always yields
/// the same bytes. Output is always 8 bits per channel: decoding it gives back
/// the grid only when every value already sits on a 1/255 step, so 16-bit
/// sources come back quantized.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>> {
    encode_rgb8_png(&grid.to_rgb8())
}

/// Encode an 8-bit RGB buffer as PNG with fixed settings.
pub fn encode_rgb8_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

fn map_decode_error(err: ImageError) -> DiffError {
    match err {
        ImageError::Unsupported(e) => DiffError::InvalidFormat(e.to_string()),
        other => DiffError::CorruptImage(other.to_string()),
    }
}
