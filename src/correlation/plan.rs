use thiserror::Error;

/// Fallback chunk width when none is requested. Below roughly this many
/// elements the dispatch overhead outweighs splitting, so short ranges run
/// as a single chunk.
pub const DEFAULT_WIDTH: usize = 3000;

#[derive(Debug, Error)]
pub enum PlanError {
	#[error("plan: Empty range: length = 0")]
	EmptyRange,
	#[error("plan: Range exceeds capacity: length = {length}, capacity = {capacity}")]
	CapacityExceeded { length: usize, capacity: usize },
}

/// Tiling of `[0, length)` into contiguous chunks of `width` elements, the
/// last chunk possibly shorter. Construction resolves the width once, so a
/// plan is deterministic and can be iterated any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
	length: usize,
	width: usize,
}

impl ChunkPlan {
	/// Resolve a requested width against `length` and validate against the
	/// capacity of the buffers the chunks will index into.
	///
	/// A requested width below 2 means "engine default": `max(length,
	/// DEFAULT_WIDTH)`, which keeps short ranges in one chunk. Widths above
	/// `length` clamp to `length`. Both errors surface here, before any task
	/// is scheduled.
	pub fn new(length: usize, requested_width: usize, capacity: usize) -> Result<Self, PlanError> {
		if length == 0 {
			return Err(PlanError::EmptyRange);
		}
		if length > capacity {
			return Err(PlanError::CapacityExceeded { length, capacity });
		}
		let mut width = requested_width;
		if width < 2 {
			width = length.max(DEFAULT_WIDTH);
		}
		if width > length {
			width = length;
		}
		Ok(Self { length, width })
	}

	#[inline]
	pub fn length(&self) -> usize {
		self.length
	}

	#[inline]
	pub fn width(&self) -> usize {
		self.width
	}

	#[inline]
	pub fn chunk_count(&self) -> usize {
		(self.length + self.width - 1) / self.width
	}

	/// Chunks as `(start, len)` pairs, in range order. Never yields an empty
	/// chunk.
	pub fn chunks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		let (length, width) = (self.length, self.width);
		(0..self.chunk_count()).map(move |i| {
			let start = i * width;
			(start, width.min(length - start))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_width_small_range_is_one_chunk() {
		let plan = ChunkPlan::new(5, 0, 5).unwrap();
		assert_eq!(plan.width(), 5);
		assert_eq!(plan.chunk_count(), 1);
		assert_eq!(plan.chunks().collect::<Vec<_>>(), vec![(0, 5)]);
	}

	#[test]
	fn test_default_width_large_range_uses_engine_default() {
		let plan = ChunkPlan::new(10_000, 0, 10_000).unwrap();
		assert_eq!(plan.width(), DEFAULT_WIDTH);
		assert_eq!(plan.chunk_count(), 4);
	}

	#[test]
	fn test_width_one_is_treated_as_default() {
		let plan = ChunkPlan::new(100, 1, 100).unwrap();
		assert_eq!(plan.width(), 100);
		assert_eq!(plan.chunk_count(), 1);
	}

	#[test]
	fn test_width_clamped_to_length() {
		let plan = ChunkPlan::new(10, 50, 10).unwrap();
		assert_eq!(plan.width(), 10);
		assert_eq!(plan.chunk_count(), 1);
	}

	#[test]
	fn test_uneven_final_chunk() {
		let plan = ChunkPlan::new(10, 4, 10).unwrap();
		assert_eq!(plan.chunk_count(), 3);
		assert_eq!(
			plan.chunks().collect::<Vec<_>>(),
			vec![(0, 4), (4, 4), (8, 2)]
		);
	}

	#[test]
	fn test_chunks_tile_range_exactly() {
		for (length, width) in [(1usize, 0usize), (7, 2), (100, 7), (3001, 0), (9000, 3000)] {
			let plan = ChunkPlan::new(length, width, length).unwrap();
			let mut next = 0;
			for (start, len) in plan.chunks() {
				assert_eq!(start, next, "gap or overlap at chunk start");
				assert!(len > 0, "empty chunk emitted");
				next = start + len;
			}
			assert_eq!(next, length, "chunks do not cover the range");
		}
	}

	#[test]
	fn test_zero_length_fails() {
		assert!(matches!(
			ChunkPlan::new(0, 0, 10),
			Err(PlanError::EmptyRange)
		));
	}

	#[test]
	fn test_capacity_exceeded_fails() {
		let err = ChunkPlan::new(11, 0, 10).unwrap_err();
		assert!(matches!(
			err,
			PlanError::CapacityExceeded {
				length: 11,
				capacity: 10
			}
		));
	}
}
