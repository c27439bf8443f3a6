use ndarray::Array2;

use crate::grid::PixelGrid;

/// 3x3 "edge enhance more" kernel: centre 9, neighbours -1 (sum = 1).
pub const EDGE_ENHANCE_MORE: [[f32; 3]; 3] = [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];

/// Convolve with a 3x3 kernel. The 1-pixel border is copied unchanged;
/// interior results are clamped to [0.0, 1.0].
pub fn convolve3x3(data: &Array2<f32>, kernel: &[[f32; 3]; 3]) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = data.clone();
    if h < 3 || w < 3 {
        return result;
    }

    for row in 1..h - 1 {
        for col in 1..w - 1 {
            let mut sum = 0.0f32;
            for (kr, krow) in kernel.iter().enumerate() {
                for (kc, &kv) in krow.iter().enumerate() {
                    sum += data[[row + kr - 1, col + kc - 1]] * kv;
                }
            }
            result[[row, col]] = sum.clamp(0.0, 1.0);
        }
    }

    result
}

/// Apply [`convolve3x3`] to every channel.
pub fn convolve3x3_grid(grid: &PixelGrid, kernel: &[[f32; 3]; 3]) -> PixelGrid {
    grid.map_channels(|ch| convolve3x3(ch, kernel))
}

/// Compute Sobel gradient magnitude image.
///
/// Returns an `Array2<f32>` of the same dimensions as input. The 1-pixel
/// border is zero (Sobel kernel needs a 3x3 neighborhood).
pub fn gradient_magnitude_array(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    if h < 3 || w < 3 {
        return result;
    }

    for row in 1..h - 1 {
        for col in 1..w - 1 {
            let gx = -data[[row - 1, col - 1]] as f64 + data[[row - 1, col + 1]] as f64
                - 2.0 * data[[row, col - 1]] as f64
                + 2.0 * data[[row, col + 1]] as f64
                - data[[row + 1, col - 1]] as f64
                + data[[row + 1, col + 1]] as f64;

            let gy = -data[[row - 1, col - 1]] as f64
                - 2.0 * data[[row - 1, col]] as f64
                - data[[row - 1, col + 1]] as f64
                + data[[row + 1, col - 1]] as f64
                + 2.0 * data[[row + 1, col]] as f64
                + data[[row + 1, col + 1]] as f64;

            result[[row, col]] = (gx * gx + gy * gy).sqrt() as f32;
        }
    }

    result
}
