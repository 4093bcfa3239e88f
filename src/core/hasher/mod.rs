//! # Hasher Module
//!
//! DCT-based perceptual hashing.
//!
//! ## How It Works
//! 1. Resize the luminance grid to a working size (default 32x32)
//! 2. Run a 2D DCT-II and keep the low-frequency top-left block (default 8x8)
//! 3. Compare every AC coefficient to the median of the block (DC excluded)
//! 4. Pack the comparisons into a bit string, most significant bit first
//!
//! The DC slot always packs a 0 bit, so an N x N block yields a hash with at
//! most N*N - 1 set bits. Visually similar images land within a small
//! Hamming distance of each other.

pub mod dct;

use serde::{Deserialize, Serialize};

use crate::core::decoder::resize_linear;
use crate::core::grid::PixelGrid;
use crate::error::HashError;

/// Default working size the grid is resized to before the transform.
pub const DEFAULT_HASH_SIZE: u32 = 32;
/// Default low-frequency block edge, giving a 64-bit hash.
pub const DEFAULT_DCT_SIZE: u32 = 8;

/// A fixed-width perceptual hash, packed MSB-first into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualHash {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl PerceptualHash {
    pub(crate) fn from_bits(bits: &[bool]) -> Self {
        let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
        let mut current_byte: u8 = 0;
        let mut bit_position = 0;

        for &bit in bits {
            if bit {
                current_byte |= 1 << (7 - bit_position);
            }
            bit_position += 1;
            if bit_position == 8 {
                bytes.push(current_byte);
                current_byte = 0;
                bit_position = 0;
            }
        }
        if bit_position > 0 {
            bytes.push(current_byte);
        }

        Self { bytes, bit_len: bits.len() }
    }

    /// Hamming distance: the number of differing bits.
    ///
    /// Symmetric, zero against itself. O(bytes) via XOR popcount.
    pub fn distance(&self, other: &Self) -> u32 {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    /// Total number of bits in the hash (`dct_size` squared).
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bit at `index`, counting from the first coefficient packed (MSB).
    pub fn bit(&self, index: usize) -> bool {
        let byte = self.bytes[index / 8];
        byte & (1 << (7 - index % 8)) != 0
    }

    /// The raw packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hexadecimal rendering, two digits per byte.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// DCT perceptual hash engine with validated parameters.
#[derive(Debug, Clone)]
pub struct PhashEngine {
    size: u32,
    dct_size: u32,
}

impl PhashEngine {
    /// Create an engine, rejecting invalid parameters eagerly.
    ///
    /// `size` is the working edge the grid is resized to; `dct_size` is the
    /// low-frequency block edge and must satisfy `0 < dct_size <= size`.
    pub fn new(size: u32, dct_size: u32) -> Result<Self, HashError> {
        if size == 0 {
            return Err(HashError::InvalidHashSize { size });
        }
        if dct_size == 0 || dct_size > size {
            return Err(HashError::InvalidDctSize { dct_size, size });
        }
        Ok(Self { size, dct_size })
    }

    /// The number of bits in hashes this engine produces.
    pub fn hash_bits(&self) -> usize {
        (self.dct_size * self.dct_size) as usize
    }

    /// Hash a luminance grid.
    pub fn hash(&self, grid: &PixelGrid) -> PerceptualHash {
        let working = resize_linear(grid, self.size, self.size);
        let coeffs = dct::dct_2d(working.as_slice(), self.size as usize);

        // Top-left dct_size x dct_size block, row-major
        let n = self.size as usize;
        let block_edge = self.dct_size as usize;
        let mut block = Vec::with_capacity(block_edge * block_edge);
        for v in 0..block_edge {
            for u in 0..block_edge {
                block.push(coeffs[v * n + u]);
            }
        }

        let median = median_without_dc(&block);

        // Index 0 is the DC slot and always packs a 0 bit
        let bits: Vec<bool> = block
            .iter()
            .enumerate()
            .map(|(i, &coeff)| i != 0 && coeff > median)
            .collect();

        PerceptualHash::from_bits(&bits)
    }
}

impl Default for PhashEngine {
    fn default() -> Self {
        Self {
            size: DEFAULT_HASH_SIZE,
            dct_size: DEFAULT_DCT_SIZE,
        }
    }
}

/// Median of the coefficients excluding the DC term at index 0.
///
/// A block of one coefficient has no AC terms, so the full block stands in.
/// For an even count the upper middle element is taken.
fn median_without_dc(block: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = if block.len() <= 1 {
        block.to_vec()
    } else {
        block[1..].to_vec()
    };
    sorted.sort_by(f64::total_cmp);
    sorted[sorted.len() / 2]
}
