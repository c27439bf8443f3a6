use ndarray::Array2;

/// Morphological opening (erosion followed by dilation) with a 3x3 square kernel.
///
/// Removes isolated foreground pixels while preserving larger regions.
pub fn morphological_opening(mask: &Array2<bool>) -> Array2<bool> {
    dilate(&erode(mask))
}

/// Morphological closing (dilation followed by erosion) with a 3x3 square kernel.
///
/// Fills pinholes and one-pixel gaps inside foreground regions.
pub fn morphological_closing(mask: &Array2<bool>) -> Array2<bool> {
    erode(&dilate(mask))
}

/// Closing then opening: bridge small gaps, then drop speckle.
pub fn close_then_open(mask: &Array2<bool>) -> Array2<bool> {
    morphological_opening(&morphological_closing(mask))
}

/// Binary erosion: a pixel stays true only if every in-bounds pixel of its 3x3
/// neighborhood is true. Out-of-bounds neighbors do not erode.
pub fn erode(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }
            result[[row, col]] = neighborhood(row, col, h, w).all(|(r, c)| mask[[r, c]]);
        }
    }

    result
}

/// Binary dilation: a pixel becomes true if any pixel in its 3x3 neighborhood is true.
pub fn dilate(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            result[[row, col]] = neighborhood(row, col, h, w).any(|(r, c)| mask[[r, c]]);
        }
    }

    result
}

/// In-bounds coordinates of the 3x3 neighborhood around (row, col).
fn neighborhood(
    row: usize,
    col: usize,
    h: usize,
    w: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let rows = row.saturating_sub(1)..(row + 2).min(h);
    rows.flat_map(move |r| (col.saturating_sub(1)..(col + 2).min(w)).map(move |c| (r, c)))
}
