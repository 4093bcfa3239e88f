//! # Decoder Module
//!
//! The seam between the triage engine and image decoding.
//!
//! The engine never touches encoded bytes itself: a [`MediaDecoder`] turns a
//! raw payload into a [`PixelGrid`] at a requested size, and
//! [`resize_linear`] rescales grids between working sizes. Both use linear
//! (triangle) interpolation so repeated runs are bit-identical.

use image::{imageops, ImageBuffer, Luma};

use crate::core::grid::PixelGrid;
use crate::error::DecodeError;

/// Decodes an encoded image payload into a luminance grid.
///
/// Implementations signal failure per entry; the streaming session treats a
/// failure as "skip this entry" and continues.
pub trait MediaDecoder: Send + Sync {
    /// Decode `bytes`, resize to `width` x `height` with linear
    /// interpolation, and collapse to single-channel luminance.
    fn decode_and_resize(
        &self,
        name: &str,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PixelGrid, DecodeError>;
}

/// Default decoder backed by the `image` crate.
///
/// Luminance conversion uses the crate's `to_luma8` (ITU-R 601 weighting);
/// the engine only relies on the weighting being consistent across calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl MediaDecoder for ImageDecoder {
    fn decode_and_resize(
        &self,
        name: &str,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PixelGrid, DecodeError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| DecodeError::DecodeFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let resized = decoded.resize_exact(width, height, imageops::FilterType::Triangle);
        let gray = resized.to_luma8();

        let data = gray.pixels().map(|p| p[0] as f64).collect();
        Ok(PixelGrid::new(width, height, data))
    }
}

/// Resize a luminance grid to `width` x `height` with linear interpolation.
pub fn resize_linear(grid: &PixelGrid, width: u32, height: u32) -> PixelGrid {
    if grid.width() == width && grid.height() == height {
        return grid.clone();
    }

    let buffer: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_fn(
        grid.width(),
        grid.height(),
        |x, y| Luma([grid.get(x, y) as f32]),
    );

    let resized = imageops::resize(&buffer, width, height, imageops::FilterType::Triangle);

    let data = resized.pixels().map(|p| p[0] as f64).collect();
    PixelGrid::new(width, height, data)
}
