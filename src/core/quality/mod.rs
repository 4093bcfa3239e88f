//! # Quality Module
//!
//! Sharpness estimation via Laplacian response variance.
//!
//! The Laplacian operator responds to edges. Sharp images have strong,
//! varied edge responses; blurry images have weak, flat ones. The variance
//! of the response over the whole frame is therefore a cheap blur proxy:
//! callers compare it against a threshold (default 250.0 at the 0-255
//! luminance scale) to flag blurry entries.

use crate::core::grid::PixelGrid;

/// Population variance of the discrete Laplacian response over all interior
/// pixels.
///
/// Grids smaller than 3x3 have no interior and return 0.0; that is the
/// degenerate case, not an error. Larger return values mean sharper images.
pub fn laplacian_variance(grid: &PixelGrid) -> f64 {
    let (width, height) = (grid.width(), grid.height());

    if width < 3 || height < 3 {
        return 0.0;
    }

    // Cross kernel: [0, 1, 0; 1, -4, 1; 0, 1, 0]
    let mut responses: Vec<f64> =
        Vec::with_capacity(((width - 2) * (height - 2)) as usize);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = grid.get(x, y);
            let top = grid.get(x, y - 1);
            let bottom = grid.get(x, y + 1);
            let left = grid.get(x - 1, y);
            let right = grid.get(x + 1, y);

            responses.push(top + bottom + left + right - 4.0 * center);
        }
    }

    let n = responses.len() as f64;
    let mean = responses.iter().sum::<f64>() / n;
    responses.iter().map(|&r| (r - mean).powi(2)).sum::<f64>() / n
}
