//! # Batch correlation session
//!
//! Owns every buffer the engine touches: the reference sequence X (length
//! `length`), the flat row-major target matrix Y (`count` rows ×  `length`),
//! the per-chunk partial slots, and the result vector R. A session is built
//! once, loaded with targets once (or re-loaded), then driven through many
//! `compute` calls that overwrite X in place and reuse all storage.
//!
//! ## Task graph per compute
//!
//! ```text
//! X chunk tasks ──▶ X merge ──┐
//!                             ├──▶ row 0 compose ──▶ R[0]
//! row 0 chunk tasks ──────────┘
//!                             ├──▶ row 1 compose ──▶ R[1]
//! row 1 chunk tasks ──────────┘
//!            ...
//! ```
//!
//! Row chunk tasks read the current X for the fused cross term but do not
//! wait on the X merge; only the compose tasks need both sides. Rows never
//! wait on each other.
//!
//! ## Errors
//! - **InvalidDimensions**: session: `length` or `count` is zero.
//! - **DataLengthMismatch**: session: a loaded slice does not match the
//!   session's dimensions.
//! - **SourceTooShort**: session: the offset copy cannot supply `length`
//!   values.
//! - **Plan**: chunk planning rejected the configuration.
//!
//! All of these surface synchronously, before any task is scheduled. Zero
//! variance and other numeric degeneracies are not errors; they propagate
//! into R as NaN/±Inf.

use std::sync::OnceLock;

use aligned_vec::{AVec, CACHELINE_ALIGN};
use thiserror::Error;

use crate::correlation::compose::{self, XStats};
use crate::correlation::kernels::{self, ChunkPartial};
use crate::correlation::plan::{ChunkPlan, PlanError};
use crate::scheduler::TaskGraph;
use crate::utilities::enums::FloatMode;

#[derive(Debug, Error)]
pub enum PccError {
	#[error("session: Invalid dimensions: length = {length}, count = {count}")]
	InvalidDimensions { length: usize, count: usize },
	#[error("session: Data length mismatch: expected = {expected}, got = {got}")]
	DataLengthMismatch { expected: usize, got: usize },
	#[error("session: Source too short: needed = {needed} from offset = {offset}, available = {available}")]
	SourceTooShort {
		needed: usize,
		offset: usize,
		available: usize,
	},
	#[error(transparent)]
	Plan(#[from] PlanError),
}

/// Configuration for a [`PccSession`]. Widths below 2 mean "engine default",
/// which resolves to one chunk over X and one chunk per target row.
#[derive(Debug, Clone, Copy)]
pub struct PccSessionBuilder {
	length: usize,
	count: usize,
	width_x: usize,
	width_y: usize,
	float_mode: FloatMode,
}

impl PccSessionBuilder {
	#[inline]
	pub fn new(length: usize, count: usize) -> Self {
		Self {
			length,
			count,
			width_x: 0,
			width_y: 0,
			float_mode: FloatMode::default(),
		}
	}

	/// Chunk width for the reference-sequence partition.
	#[inline]
	pub fn width_x(mut self, width: usize) -> Self {
		self.width_x = width;
		self
	}

	/// Chunk width for the per-row target partitions.
	#[inline]
	pub fn width_y(mut self, width: usize) -> Self {
		self.width_y = width;
		self
	}

	#[inline]
	pub fn float_mode(mut self, mode: FloatMode) -> Self {
		self.float_mode = mode;
		self
	}

	/// Validate the configuration and allocate all storage, zero-initialized.
	/// No later operation allocates buffer memory.
	pub fn build(self) -> Result<PccSession, PccError> {
		if self.length == 0 || self.count == 0 {
			return Err(PccError::InvalidDimensions {
				length: self.length,
				count: self.count,
			});
		}
		let x_plan = ChunkPlan::new(self.length, self.width_x, self.length)?;
		let y_plan = ChunkPlan::new(self.length, self.width_y, self.length)?;

		let mut x = AVec::with_capacity(CACHELINE_ALIGN, self.length);
		x.resize(self.length, 0.0);
		let mut y = AVec::with_capacity(CACHELINE_ALIGN, self.length * self.count);
		y.resize(self.length * self.count, 0.0);
		let mut r = AVec::with_capacity(CACHELINE_ALIGN, self.count);
		r.resize(self.count, 0.0);

		let x_partials = (0..x_plan.chunk_count()).map(|_| OnceLock::new()).collect();
		let y_partials = (0..y_plan.chunk_count() * self.count)
			.map(|_| OnceLock::new())
			.collect();

		Ok(PccSession {
			length: self.length,
			count: self.count,
			float_mode: self.float_mode,
			x_plan,
			y_plan,
			x,
			y,
			r,
			x_partials,
			x_result: OnceLock::new(),
			y_partials,
		})
	}
}

/// Reusable batch-correlation state: call [`PccSession::load_y`] once,
/// then alternate [`PccSession::write_x`] (or [`PccSession::copy_x_from`])
/// and [`PccSession::compute`]. Dropping the session releases everything.
pub struct PccSession {
	length: usize,
	count: usize,
	float_mode: FloatMode,
	x_plan: ChunkPlan,
	y_plan: ChunkPlan,
	x: AVec<f32>,
	y: AVec<f32>,
	r: AVec<f32>,
	x_partials: Vec<OnceLock<ChunkPartial>>,
	x_result: OnceLock<XStats>,
	y_partials: Vec<OnceLock<ChunkPartial>>,
}

impl PccSession {
	/// Default-configured session, the common entry point.
	#[inline]
	pub fn allocate(length: usize, count: usize) -> Result<Self, PccError> {
		PccSessionBuilder::new(length, count).build()
	}

	#[inline]
	pub fn length(&self) -> usize {
		self.length
	}

	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	#[inline]
	pub fn float_mode(&self) -> FloatMode {
		self.float_mode
	}

	/// The result vector of the most recent compute.
	#[inline]
	pub fn results(&self) -> &[f32] {
		&self.r
	}

	/// Overwrite the target matrix. `values` is row-major, `count` rows of
	/// `length` each.
	pub fn load_y(&mut self, values: &[f32]) -> Result<(), PccError> {
		let expected = self.length * self.count;
		if values.len() != expected {
			return Err(PccError::DataLengthMismatch {
				expected,
				got: values.len(),
			});
		}
		self.y.copy_from_slice(values);
		Ok(())
	}

	/// Overwrite the reference sequence with exactly `length` values.
	pub fn write_x(&mut self, values: &[f32]) -> Result<(), PccError> {
		if values.len() != self.length {
			return Err(PccError::DataLengthMismatch {
				expected: self.length,
				got: values.len(),
			});
		}
		self.x.copy_from_slice(values);
		Ok(())
	}

	/// Overwrite the reference sequence from a sub-range of a larger buffer:
	/// `source[offset .. offset + length]`.
	pub fn copy_x_from(&mut self, source: &[f32], offset: usize) -> Result<(), PccError> {
		let end = offset.saturating_add(self.length);
		if source.len() < end {
			return Err(PccError::SourceTooShort {
				needed: self.length,
				offset,
				available: source.len(),
			});
		}
		self.x.copy_from_slice(&source[offset..end]);
		Ok(())
	}

	/// Score the current X against every target row. Builds the dependency
	/// graph, runs it on the shared pool, and blocks until R is complete.
	/// Never fails for a built session; degenerate rows come back NaN/±Inf.
	///
	/// The returned view is valid until the next `compute` or the session is
	/// dropped. Y is never mutated; repeated calls reuse all storage.
	pub fn compute(&mut self) -> &[f32] {
		self.x_result.take();
		for slot in &mut self.x_partials {
			slot.take();
		}
		for slot in &mut self.y_partials {
			slot.take();
		}

		let n = self.length;
		let mode = self.float_mode;
		let x_plan = self.x_plan;
		let y_plan = self.y_plan;
		let chunks_per_row = y_plan.chunk_count();

		let x: &[f32] = &self.x;
		let y: &[f32] = &self.y;
		let x_partials: &[OnceLock<ChunkPartial>] = &self.x_partials;
		let y_partials: &[OnceLock<ChunkPartial>] = &self.y_partials;
		let x_result: &OnceLock<XStats> = &self.x_result;
		let r: &mut [f32] = &mut self.r;

		let task_count = x_plan.chunk_count() + 1 + self.count * (chunks_per_row + 1);
		let mut graph = TaskGraph::with_capacity(task_count);

		let mut x_tasks = Vec::with_capacity(x_plan.chunk_count());
		for (slot, (start, len)) in x_partials.iter().zip(x_plan.chunks()) {
			x_tasks.push(graph.task(&[], move || {
				let _ = slot.set(kernels::x_chunk_partial(&x[start..start + len], mode));
			}));
		}
		let x_merge = graph.task(&x_tasks, move || {
			let merged = kernels::merge_partials(x_partials.iter().map(take_slot));
			let _ = x_result.set(compose::x_stats(n, &merged));
		});

		for (row, r_slot) in r.iter_mut().enumerate() {
			let row_slots = &y_partials[row * chunks_per_row..(row + 1) * chunks_per_row];
			let row_y = &y[row * n..(row + 1) * n];
			let mut deps = Vec::with_capacity(chunks_per_row + 1);
			for (slot, (start, len)) in row_slots.iter().zip(y_plan.chunks()) {
				deps.push(graph.task(&[], move || {
					let _ = slot.set(kernels::y_chunk_partial(
						&row_y[start..start + len],
						&x[start..start + len],
						mode,
					));
				}));
			}
			deps.push(x_merge);
			graph.task(&deps, move || {
				let row_agg = kernels::merge_partials(row_slots.iter().map(take_slot));
				let stats = take_stats(x_result);
				*r_slot = compose::compose(n, &stats, &row_agg);
			});
		}

		graph.execute();
		&self.r
	}
}

// Slot reads below are ordered after their writers by the task graph.
#[inline]
fn take_slot(slot: &OnceLock<ChunkPartial>) -> ChunkPartial {
	*slot.get().expect("chunk partial not computed")
}

#[inline]
fn take_stats(slot: &OnceLock<XStats>) -> XStats {
	*slot.get().expect("reference statistics not merged")
}
