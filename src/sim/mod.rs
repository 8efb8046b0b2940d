pub mod driver;
pub mod process;

pub use driver::{DEFAULT_TIMELINE_LEN, Schedule, compute_schedule};
pub use process::{ExecutionInterval, Process, ProcessMetrics};
