#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FloatMode {
	/// Reassociated multi-lane accumulation. Fastest; results may differ from
	/// strictly ordered accumulation in the last bits.
	Fast,
	/// Accumulate in input order. Bit-reproducible for a fixed chunk width.
	Strict,
}

impl Default for FloatMode {
	fn default() -> Self {
		FloatMode::Fast
	}
}
