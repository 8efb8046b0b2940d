pub mod core;
pub mod deadlock;
pub mod disk;
pub mod error;
pub mod memory;
pub mod question;
pub mod scheduler;
pub mod sim;
pub mod verify;

pub use deadlock::{BankerState, SafetyReport, check_safety};
pub use disk::{DiskAlgorithm, DiskConfig, Direction, SeekPlan, compare_all, compute_seek};
pub use error::{ConfigError, Error, InputError, Result};
pub use memory::{Allocation, Hole, MemoryProcess, Policy, compute_allocation};
pub use question::{CpuQuestion, MemoryQuestion};
pub use scheduler::{Algorithm, CpuConfig, Scheduler};
pub use sim::{DEFAULT_TIMELINE_LEN, ExecutionInterval, Process, Schedule, compute_schedule};
pub use verify::{Slot, Verdict, verify};
