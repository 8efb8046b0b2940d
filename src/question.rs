use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    core::Ticks,
    error::{InputError, Result},
    memory::{Allocation, Hole, MemoryProcess, Policy, Size, compute_allocation},
    scheduler::{Algorithm, CpuConfig},
    sim::{DEFAULT_TIMELINE_LEN, Process, Schedule, compute_schedule},
    verify::{Slot, Verdict, verify},
};

pub const DEFAULT_QUANTUM: Ticks = 2;

/// A stored CPU question. Only the inputs travel; the answer is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuQuestion {
    pub algorithm: String,
    #[serde(default)]
    pub quantum: Option<Ticks>,
    pub num_processes: usize,
    pub processes: Vec<Process>,
}

impl CpuQuestion {
    /// Random processes with arrivals in `0..5`, bursts in `1..=7` and
    /// priorities in `1..=5`, named `P1..Pn`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &CpuConfig, num_processes: usize) -> Self {
        let processes = (0..num_processes)
            .map(|i| {
                Process::new(
                    format!("P{}", i + 1),
                    rng.random_range(0..5),
                    rng.random_range(1..=7),
                )
                .with_priority(rng.random_range(1..=5))
            })
            .collect();

        Self {
            algorithm: config.algorithm().name().to_owned(),
            quantum: Some(config.quantum().unwrap_or(DEFAULT_QUANTUM)),
            num_processes,
            processes,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validated engine configuration for this question.
    pub fn config(&self) -> Result<CpuConfig> {
        if self.num_processes != self.processes.len() {
            return Err(InputError::ProcessCountMismatch {
                declared: self.num_processes,
                listed: self.processes.len(),
            }
            .into());
        }
        let algorithm: Algorithm = self.algorithm.parse()?;
        Ok(CpuConfig::new(algorithm, self.quantum)?)
    }

    pub fn schedule(&self) -> Result<Schedule> {
        compute_schedule(&self.processes, &self.config()?)
    }

    pub fn canonical_answer(&self) -> Result<Vec<Slot>> {
        Ok(self.schedule()?.dense(DEFAULT_TIMELINE_LEN))
    }

    pub fn check(&self, submitted: &[Slot]) -> Result<Verdict> {
        verify(&self.canonical_answer()?, submitted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryQuestion {
    pub algorithm: String,
    pub memory_blocks: Vec<BlockPayload>,
    pub processes: Vec<MemoryProcess>,
}

impl MemoryQuestion {
    /// Random holes of `10..30` units and processes of `5..20` units.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        policy: Policy,
        num_blocks: usize,
        num_processes: usize,
    ) -> Self {
        let memory_blocks = (0..num_blocks)
            .map(|_| BlockPayload {
                size: rng.random_range(10..30),
            })
            .collect();
        let processes = (0..num_processes)
            .map(|i| MemoryProcess::new(format!("P{}", i + 1), rng.random_range(5..20)))
            .collect();

        Self {
            algorithm: policy.name().to_owned(),
            memory_blocks,
            processes,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn policy(&self) -> Result<Policy> {
        Ok(self.algorithm.parse()?)
    }

    pub fn holes(&self) -> Vec<Hole> {
        self.memory_blocks.iter().map(|b| Hole::new(b.size)).collect()
    }

    pub fn allocation(&self) -> Result<Allocation> {
        compute_allocation(&self.holes(), &self.processes, self.policy()?)
    }

    pub fn canonical_answer(&self) -> Result<Vec<Slot>> {
        Ok(self.allocation()?.dense())
    }

    pub fn check(&self, submitted: &[Slot]) -> Result<Verdict> {
        verify(&self.canonical_answer()?, submitted)
    }
}
