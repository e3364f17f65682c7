//! Final composition of the correlation coefficient from merged aggregates.
//!
//! The reference-side statistics are folded once per compute and shared by
//! every row; each row then combines them with its own aggregate. Zero
//! variance on either side makes a denominator zero and the quotient NaN or
//! ±Inf — that is the defined result, not an error.

use crate::correlation::kernels::ChunkPartial;

/// Reference-sequence statistics shared across all rows of one compute:
/// the plain sum and the normalization term `sqrt(n·Σx² − (Σx)²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XStats {
	pub sum: f32,
	pub norm: f32,
}

/// Fold the merged reference-side aggregate into [`XStats`].
#[inline]
pub fn x_stats(n: usize, merged: &ChunkPartial) -> XStats {
	let nf = n as f32;
	XStats {
		sum: merged.sum,
		norm: (nf * merged.sum_sq - merged.sum * merged.sum).sqrt(),
	}
}

/// Pearson coefficient for one row:
/// `(n·Σxy − Σx·Σy) / sqrt(n·Σx² − (Σx)²) / sqrt(n·Σy² − (Σy)²)`.
#[inline]
pub fn compose(n: usize, x: &XStats, row: &ChunkPartial) -> f32 {
	let nf = n as f32;
	(nf * row.sum_cross - x.sum * row.sum)
		/ x.norm
		/ (nf * row.sum_sq - row.sum * row.sum).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::correlation::kernels::y_chunk_partial;
	use crate::utilities::enums::FloatMode;

	fn stats_for(x: &[f32]) -> XStats {
		let p = y_chunk_partial(x, x, FloatMode::Strict);
		x_stats(x.len(), &p)
	}

	#[test]
	fn test_identical_sequences_compose_to_one() {
		let x = [1.0f32, 2.0, 3.0, 4.0, 5.0];
		let xs = stats_for(&x);
		let row = y_chunk_partial(&x, &x, FloatMode::Strict);
		let r = compose(x.len(), &xs, &row);
		assert!((r - 1.0).abs() < 1e-5, "expected 1.0, got {}", r);
	}

	#[test]
	fn test_negated_sequence_composes_to_minus_one() {
		let x = [1.0f32, 2.0, 3.0, 4.0, 5.0];
		let y = [-1.0f32, -2.0, -3.0, -4.0, -5.0];
		let xs = stats_for(&x);
		let row = y_chunk_partial(&y, &x, FloatMode::Strict);
		let r = compose(x.len(), &xs, &row);
		assert!((r + 1.0).abs() < 1e-5, "expected -1.0, got {}", r);
	}

	#[test]
	fn test_zero_variance_reference_is_nan() {
		let x = [2.0f32, 2.0, 2.0, 2.0];
		let y = [1.0f32, 2.0, 3.0, 4.0];
		let xs = stats_for(&x);
		assert_eq!(xs.norm, 0.0);
		let row = y_chunk_partial(&y, &x, FloatMode::Strict);
		assert!(compose(x.len(), &xs, &row).is_nan());
	}

	#[test]
	fn test_zero_variance_row_is_nan() {
		let x = [1.0f32, 2.0, 3.0, 4.0];
		let y = [7.0f32, 7.0, 7.0, 7.0];
		let xs = stats_for(&x);
		let row = y_chunk_partial(&y, &x, FloatMode::Strict);
		assert!(compose(x.len(), &xs, &row).is_nan());
	}

	#[test]
	fn test_norm_term_known_value() {
		// x = [1..5]: n·Σx² − (Σx)² = 5·55 − 225 = 50.
		let xs = stats_for(&[1.0, 2.0, 3.0, 4.0, 5.0]);
		assert!((xs.norm - 50f32.sqrt()).abs() < 1e-6);
		assert_eq!(xs.sum, 15.0);
	}
}
