pub mod fcfs;
pub mod priority;
pub mod round_robin;
pub mod sjf;
pub mod srtf;

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::state::{SimCtx, TaskId, Ticks};
use crate::error::ConfigError;
pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

// Run to completion once dispatched
pub const SLICE_UNBOUNDED: Ticks = Ticks::MAX;

pub trait Scheduler {
    fn init(ctx: &mut SimCtx, config: &CpuConfig) -> Self;

    /// Called when `task` becomes ready, either on arrival or after its slice
    /// expired with service left.
    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId);

    /// Pick the next task to run, or `None` to leave the CPU idle.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "SJF")]
    Sjf,
    #[serde(rename = "SRTF")]
    Srtf,
    Priority,
    #[serde(rename = "RR")]
    RoundRobin,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Self::Fcfs,
        Self::Sjf,
        Self::Srtf,
        Self::Priority,
        Self::RoundRobin,
    ];

    /// Identifier used by question payloads.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Srtf => "SRTF",
            Self::Priority => "Priority",
            Self::RoundRobin => "RR",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fcfs => "First Come First Served",
            Self::Sjf => "Shortest Job First",
            Self::Srtf => "Shortest Remaining Time First",
            Self::Priority => "Priority",
            Self::RoundRobin => "Round Robin",
        })
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "srtf" => Ok(Self::Srtf),
            "priority" => Ok(Self::Priority),
            "rr" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Validated CPU scheduling configuration.
///
/// Round robin always carries a quantum; the other algorithms never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuConfig {
    algorithm: Algorithm,
    quantum: Option<NonZeroU64>,
}

impl CpuConfig {
    pub fn new(algorithm: Algorithm, quantum: Option<Ticks>) -> Result<Self, ConfigError> {
        let quantum = match (algorithm, quantum) {
            (Algorithm::RoundRobin, None) => return Err(ConfigError::MissingQuantum),
            (Algorithm::RoundRobin, Some(q)) => {
                Some(NonZeroU64::new(q).ok_or(ConfigError::ZeroQuantum)?)
            }
            _ => None,
        };
        Ok(Self { algorithm, quantum })
    }

    pub fn parse(algorithm: &str, quantum: Option<Ticks>) -> Result<Self, ConfigError> {
        Self::new(algorithm.parse()?, quantum)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn quantum(&self) -> Option<Ticks> {
        self.quantum.map(NonZeroU64::get)
    }
}

/// Fails for round robin, which has no quantum to go on.
impl TryFrom<Algorithm> for CpuConfig {
    type Error = ConfigError;

    fn try_from(algorithm: Algorithm) -> Result<Self, Self::Error> {
        Self::new(algorithm, None)
    }
}
