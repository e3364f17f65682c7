#![allow(clippy::needless_range_loop)]

pub mod correlation;
pub mod scheduler;
pub mod utilities;
