//! Single-channel luminance grid, the pixel currency of the engine.
//!
//! Every numeric stage (DCT, hashing, sharpness) consumes this type so the
//! decoding collaborator stays behind one seam.

/// A row-major single-channel luminance grid.
///
/// Values follow the 0-255 luminance scale of the decoder. The grid is
/// transient: it lives for one entry's processing and is dropped afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl PixelGrid {
    /// Create a grid from row-major luminance values.
    ///
    /// Panics if `data.len() != width * height`; grids are only built by
    /// decoder implementations and test helpers, never from user input.
    pub fn new(width: u32, height: u32, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "luminance data does not match grid dimensions"
        );
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance at (x, y). Callers stay in bounds; the numeric stages only
    /// iterate over `0..width` x `0..height`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[(y * self.width + x) as usize]
    }

    /// The raw row-major luminance values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
