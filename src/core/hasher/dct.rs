//! 2D DCT-II transform kernel.
//!
//! Orthonormal scaling: `alpha(0) = sqrt(1/N)`, `alpha(k>0) = sqrt(2/N)`.
//! The transform is separable, so it runs as a row pass followed by a column
//! pass over one precomputed cosine table. O(N^2) table, O(N^4) total work,
//! which is fine at the hash working size of 32.

use std::f64::consts::PI;

/// Compute the 2D DCT-II of a row-major `n` x `n` matrix.
///
/// Output index `[v * n + u]` holds the coefficient for vertical frequency
/// `v` and horizontal frequency `u`; `[0]` is the DC term. NaN or infinite
/// inputs propagate into the output.
pub fn dct_2d(input: &[f64], n: usize) -> Vec<f64> {
    debug_assert_eq!(input.len(), n * n);

    // cos_table[u * n + x] = cos((2x + 1) * u * pi / 2N), shared by both axes
    let cos_table: Vec<f64> = (0..n)
        .flat_map(|u| {
            (0..n).map(move |x| ((2 * x + 1) as f64 * u as f64 * PI / (2.0 * n as f64)).cos())
        })
        .collect();

    let alpha = |k: usize| -> f64 {
        if k == 0 {
            (1.0 / n as f64).sqrt()
        } else {
            (2.0 / n as f64).sqrt()
        }
    };

    // Row pass: temp[y][u] = alpha(u) * sum_x input[y][x] * cos_table[u][x]
    let mut temp = vec![0.0; n * n];
    for y in 0..n {
        for u in 0..n {
            let mut sum = 0.0;
            for x in 0..n {
                sum += input[y * n + x] * cos_table[u * n + x];
            }
            temp[y * n + u] = alpha(u) * sum;
        }
    }

    // Column pass: output[v][u] = alpha(v) * sum_y temp[y][u] * cos_table[v][y]
    let mut output = vec![0.0; n * n];
    for u in 0..n {
        for v in 0..n {
            let mut sum = 0.0;
            for y in 0..n {
                sum += temp[y * n + u] * cos_table[v * n + y];
            }
            output[v * n + u] = alpha(v) * sum;
        }
    }

    output
}
