pub mod baseline;
pub mod compose;
pub mod kernels;
pub mod plan;
pub mod session;

pub use plan::{ChunkPlan, PlanError, DEFAULT_WIDTH};
pub use session::{PccError, PccSession, PccSessionBuilder};
