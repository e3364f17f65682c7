//! Partition kernels and the chunk merger.
//!
//! A partition kernel reduces one contiguous chunk into a [`ChunkPartial`];
//! kernels have no side effects and may run concurrently on disjoint chunks.
//! The merger folds the per-chunk partials of one aggregate back into a
//! single value, serially and in chunk order, so a given configuration always
//! accumulates in the same order.

use crate::utilities::enums::FloatMode;

/// Number of independent accumulators in the reassociated fast path. Eight
/// f32 lanes fill a 256-bit vector register.
const LANES: usize = 8;

/// Partial reduction over one chunk: `sum = Σv`, `sum_sq = Σv²`, and for the
/// fused target kernel `sum_cross = Σ v·x` against the reference sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChunkPartial {
	pub sum: f32,
	pub sum_sq: f32,
	pub sum_cross: f32,
}

/// Reduce a chunk of the reference sequence: sum and sum-of-squares. The
/// cross term stays zero.
#[inline]
pub fn x_chunk_partial(chunk: &[f32], mode: FloatMode) -> ChunkPartial {
	match mode {
		FloatMode::Strict => x_chunk_strict(chunk),
		FloatMode::Fast => x_chunk_fast(chunk),
	}
}

/// Reduce a chunk of one target row, fused with the cross product against
/// the matching chunk of the reference sequence. Both slices cover the same
/// in-row span and have equal length.
#[inline]
pub fn y_chunk_partial(y_chunk: &[f32], x_chunk: &[f32], mode: FloatMode) -> ChunkPartial {
	debug_assert_eq!(y_chunk.len(), x_chunk.len());
	match mode {
		FloatMode::Strict => y_chunk_strict(y_chunk, x_chunk),
		FloatMode::Fast => y_chunk_fast(y_chunk, x_chunk),
	}
}

/// Fold per-chunk partials into one aggregate. Serial, in iteration order;
/// callers pass partials in chunk order for reproducible rounding.
#[inline]
pub fn merge_partials(partials: impl Iterator<Item = ChunkPartial>) -> ChunkPartial {
	let mut merged = ChunkPartial::default();
	for p in partials {
		merged.sum += p.sum;
		merged.sum_sq += p.sum_sq;
		merged.sum_cross += p.sum_cross;
	}
	merged
}

fn x_chunk_strict(chunk: &[f32]) -> ChunkPartial {
	let mut sum = 0f32;
	let mut sum_sq = 0f32;
	for &v in chunk {
		sum += v;
		sum_sq += v * v;
	}
	ChunkPartial {
		sum,
		sum_sq,
		sum_cross: 0.0,
	}
}

fn x_chunk_fast(chunk: &[f32]) -> ChunkPartial {
	let mut sum = [0f32; LANES];
	let mut sum_sq = [0f32; LANES];
	let split = chunk.len() - chunk.len() % LANES;
	let mut i = 0;
	while i < split {
		for l in 0..LANES {
			let v = chunk[i + l];
			sum[l] += v;
			sum_sq[l] += v * v;
		}
		i += LANES;
	}
	let mut out = ChunkPartial::default();
	for l in 0..LANES {
		out.sum += sum[l];
		out.sum_sq += sum_sq[l];
	}
	for &v in &chunk[split..] {
		out.sum += v;
		out.sum_sq += v * v;
	}
	out
}

fn y_chunk_strict(y_chunk: &[f32], x_chunk: &[f32]) -> ChunkPartial {
	let mut sum = 0f32;
	let mut sum_sq = 0f32;
	let mut sum_cross = 0f32;
	for (&v, &u) in y_chunk.iter().zip(x_chunk) {
		sum += v;
		sum_sq += v * v;
		sum_cross += v * u;
	}
	ChunkPartial {
		sum,
		sum_sq,
		sum_cross,
	}
}

fn y_chunk_fast(y_chunk: &[f32], x_chunk: &[f32]) -> ChunkPartial {
	let mut sum = [0f32; LANES];
	let mut sum_sq = [0f32; LANES];
	let mut sum_cross = [0f32; LANES];
	let split = y_chunk.len() - y_chunk.len() % LANES;
	let mut i = 0;
	while i < split {
		for l in 0..LANES {
			let v = y_chunk[i + l];
			let u = x_chunk[i + l];
			sum[l] += v;
			sum_sq[l] += v * v;
			sum_cross[l] += v * u;
		}
		i += LANES;
	}
	let mut out = ChunkPartial::default();
	for l in 0..LANES {
		out.sum += sum[l];
		out.sum_sq += sum_sq[l];
		out.sum_cross += sum_cross[l];
	}
	for k in split..y_chunk.len() {
		let v = y_chunk[k];
		let u = x_chunk[k];
		out.sum += v;
		out.sum_sq += v * v;
		out.sum_cross += v * u;
	}
	out
}
