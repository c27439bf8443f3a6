use std::fmt;

use image::{Rgb, Rgb32FImage, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// Width x height of an image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn longer_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// True when either side is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A 3-channel RGB image with f32 intensities in [0.0, 1.0].
///
/// Each channel is row-major with shape = (height, width). Grids are treated as
/// immutable values: every pipeline stage builds a new grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    pub red: Array2<f32>,
    pub green: Array2<f32>,
    pub blue: Array2<f32>,
}

impl PixelGrid {
    /// Create a grid from three equally shaped channels.
    pub fn from_channels(red: Array2<f32>, green: Array2<f32>, blue: Array2<f32>) -> Self {
        debug_assert_eq!(red.dim(), green.dim());
        debug_assert_eq!(red.dim(), blue.dim());
        Self { red, green, blue }
    }

    /// A grid filled with one colour.
    pub fn filled(dims: Dimensions, rgb: [f32; 3]) -> Self {
        let shape = (dims.height as usize, dims.width as usize);
        Self {
            red: Array2::from_elem(shape, rgb[0]),
            green: Array2::from_elem(shape, rgb[1]),
            blue: Array2::from_elem(shape, rgb[2]),
        }
    }

    pub fn width(&self) -> usize {
        self.red.ncols()
    }

    pub fn height(&self) -> usize {
        self.red.nrows()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width() as u32, self.height() as u32)
    }

    /// RGB triple at (row, col).
    pub fn pixel(&self, row: usize, col: usize) -> [f32; 3] {
        [
            self.red[[row, col]],
            self.green[[row, col]],
            self.blue[[row, col]],
        ]
    }

    /// Channels in R, G, B order.
    pub fn channels(&self) -> [&Array2<f32>; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// BT.601 luminance projection.
    pub fn luminance(&self) -> Array2<f32> {
        let mut lum = Array2::<f32>::zeros(self.red.dim());
        ndarray::Zip::from(&mut lum)
            .and(&self.red)
            .and(&self.green)
            .and(&self.blue)
            .for_each(|l, &r, &g, &b| {
                *l = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
            });
        lum
    }

    /// Apply a function to each channel independently, producing a new grid.
    pub fn map_channels<F>(&self, mut f: F) -> PixelGrid
    where
        F: FnMut(&Array2<f32>) -> Array2<f32>,
    {
        PixelGrid {
            red: f(&self.red),
            green: f(&self.green),
            blue: f(&self.blue),
        }
    }

    /// Build a grid from a float RGB image buffer, clamping to [0.0, 1.0].
    pub fn from_rgb32f(img: &Rgb32FImage) -> Self {
        let (w, h) = img.dimensions();
        let shape = (h as usize, w as usize);
        let mut red = Array2::<f32>::zeros(shape);
        let mut green = Array2::<f32>::zeros(shape);
        let mut blue = Array2::<f32>::zeros(shape);

        for (col, row, px) in img.enumerate_pixels() {
            let idx = [row as usize, col as usize];
            red[idx] = px.0[0].clamp(0.0, 1.0);
            green[idx] = px.0[1].clamp(0.0, 1.0);
            blue[idx] = px.0[2].clamp(0.0, 1.0);
        }

        Self { red, green, blue }
    }

    /// Convert to a float RGB image buffer.
    pub fn to_rgb32f(&self) -> Rgb32FImage {
        let (h, w) = (self.height(), self.width());
        Rgb32FImage::from_fn(w as u32, h as u32, |col, row| {
            Rgb(self.pixel(row as usize, col as usize))
        })
    }

    /// Build a grid from an 8-bit RGB image buffer.
    pub fn from_rgb8(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let shape = (h as usize, w as usize);
        let mut red = Array2::<f32>::zeros(shape);
        let mut green = Array2::<f32>::zeros(shape);
        let mut blue = Array2::<f32>::zeros(shape);

        for (col, row, px) in img.enumerate_pixels() {
            let idx = [row as usize, col as usize];
            red[idx] = px.0[0] as f32 / 255.0;
            green[idx] = px.0[1] as f32 / 255.0;
            blue[idx] = px.0[2] as f32 / 255.0;
        }

        Self { red, green, blue }
    }

    /// Quantize to an 8-bit RGB image buffer (round to nearest).
    pub fn to_rgb8(&self) -> RgbImage {
        let (h, w) = (self.height(), self.width());
        RgbImage::from_fn(w as u32, h as u32, |col, row| {
            let [r, g, b] = self.pixel(row as usize, col as usize);
            Rgb([quantize(r), quantize(g), quantize(b)])
        })
    }
}

/// Map a [0.0, 1.0] intensity to the nearest 8-bit level.
pub fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Per-pixel change intensity in [0.0, 1.0], same resolution as the working
/// images. Pre-threshold, so renderings can show gradation.
#[derive(Clone, Debug, PartialEq)]
pub struct DifferenceMap {
    pub data: Array2<f32>,
}

impl DifferenceMap {
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width() as u32, self.height() as u32)
    }

    /// Boolean grid of values strictly above `threshold`.
    pub fn above(&self, threshold: f32) -> Array2<bool> {
        self.data.mapv(|v| v > threshold)
    }
}

/// `true` marks a pixel excluded from scoring.
pub type ExclusionMask = Array2<bool>;
