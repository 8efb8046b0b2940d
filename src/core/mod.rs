pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, SchedOutcome, coalesce};
pub use event::SchedEvent;
pub use state::{Dsq, DsqId, Rank, SimCtx, Slice, Task, TaskId, TaskState, Ticks};
