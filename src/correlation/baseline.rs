//! Single-threaded reference formulas.
//!
//! Only intended to form a baseline for tests and benchmarks; the production
//! path is the chunked parallel session. `pcc_f64` widens to f64 and serves
//! as the high-precision oracle for tolerance checks.

/// Sum of the slice.
pub fn sum(x: &[f32]) -> f32 {
	let mut acc = 0f32;
	for &v in x {
		acc += v;
	}
	acc
}

/// Sum of the elementwise product of two equal-length slices.
pub fn sum_prod(x: &[f32], y: &[f32]) -> f32 {
	debug_assert_eq!(x.len(), y.len());
	let mut acc = 0f32;
	for (&a, &b) in x.iter().zip(y) {
		acc += a * b;
	}
	acc
}

/// Pearson correlation coefficient of two equal-length slices
/// (see https://en.wikipedia.org/wiki/Pearson_correlation_coefficient).
pub fn pcc(x: &[f32], y: &[f32]) -> f32 {
	let n = x.len() as f32;
	let sum_x = sum(x);
	let sum_y = sum(y);
	(n * sum_prod(x, y) - sum_x * sum_y)
		/ (n * sum_prod(x, x) - sum_x * sum_x).sqrt()
		/ (n * sum_prod(y, y) - sum_y * sum_y).sqrt()
}

/// Batched form over a flat row-major target matrix: the reference-side
/// statistics are computed once and shared across rows.
pub fn pcc_rows(x: &[f32], y_flat: &[f32]) -> Vec<f32> {
	let n = x.len();
	let nf = n as f32;
	let sum_x = sum(x);
	let norm_x = (nf * sum_prod(x, x) - sum_x * sum_x).sqrt();
	y_flat
		.chunks_exact(n)
		.map(|row| {
			let sum_y = sum(row);
			(nf * sum_prod(x, row) - sum_x * sum_y)
				/ norm_x
				/ (nf * sum_prod(row, row) - sum_y * sum_y).sqrt()
		})
		.collect()
}

/// f64 oracle: same formula, widened accumulation.
pub fn pcc_f64(x: &[f32], y: &[f32]) -> f64 {
	debug_assert_eq!(x.len(), y.len());
	let n = x.len() as f64;
	let mut sum_x = 0f64;
	let mut sum_y = 0f64;
	let mut sum_xx = 0f64;
	let mut sum_yy = 0f64;
	let mut sum_xy = 0f64;
	for (&a, &b) in x.iter().zip(y) {
		let (a, b) = (a as f64, b as f64);
		sum_x += a;
		sum_y += b;
		sum_xx += a * a;
		sum_yy += b * b;
		sum_xy += a * b;
	}
	(n * sum_xy - sum_x * sum_y)
		/ (n * sum_xx - sum_x * sum_x).sqrt()
		/ (n * sum_yy - sum_y * sum_y).sqrt()
}
