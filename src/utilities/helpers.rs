/// Absolute-difference check that treats two NaNs as equal, so degenerate
/// outputs can be compared like ordinary ones.
#[inline]
pub fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
	if a.is_nan() && b.is_nan() {
		return true;
	}
	(a - b).abs() <= tol
}

/// Relative gap |a - b| / max(|a|, |b|), 0.0 when both sides are zero or
/// both are NaN. Used to compare reduction results across chunk widths and
/// float modes, where only a relative band is meaningful.
#[inline]
pub fn relative_gap(a: f32, b: f32) -> f32 {
	if a.is_nan() && b.is_nan() {
		return 0.0;
	}
	let scale = a.abs().max(b.abs());
	if scale == 0.0 {
		return 0.0;
	}
	(a - b).abs() / scale
}
