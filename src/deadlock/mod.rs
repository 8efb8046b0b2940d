pub mod banker;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use banker::check_safety;

pub type Units = u64;

/// Resource totals plus the claim and holding of every process.
///
/// Row `i` of `max` and `allocation` belongs to process `P{i+1}`; column `j`
/// to resource `R{j+1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankerState {
    pub resources: Vec<Units>,
    pub max: Vec<Vec<Units>>,
    pub allocation: Vec<Vec<Units>>,
}

impl BankerState {
    /// Totals in `5..=10`, claims up to the total, and holdings that never
    /// exceed either the claim or what is left of the total.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, num_processes: usize, num_resources: usize) -> Self {
        let resources: Vec<Units> = (0..num_resources).map(|_| rng.random_range(5..=10)).collect();
        let mut free = resources.clone();

        let mut max = Vec::with_capacity(num_processes);
        let mut allocation = Vec::with_capacity(num_processes);
        for _ in 0..num_processes {
            let claim: Vec<Units> = resources.iter().map(|&t| rng.random_range(0..=t)).collect();
            let held: Vec<Units> = claim
                .iter()
                .zip(free.iter_mut())
                .map(|(&c, f)| {
                    let units = rng.random_range(0..=c.min(*f));
                    *f -= units;
                    units
                })
                .collect();
            max.push(claim);
            allocation.push(held);
        }

        Self {
            resources,
            max,
            allocation,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn num_processes(&self) -> usize {
        self.max.len()
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }
}

/// Outcome of the safety algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyReport {
    pub state: BankerState,
    /// Totals minus everything currently held.
    pub available: Vec<Units>,
    /// `max - allocation`, row by row.
    pub need: Vec<Vec<Units>>,
    /// Processes in the order they can finish.
    pub safe_sequence: Vec<usize>,
    /// Processes that can never finish. Empty exactly when the state is safe.
    pub blocked: Vec<usize>,
}

impl SafetyReport {
    pub fn is_safe(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn deadlock(&self) -> bool {
        !self.is_safe()
    }
}

fn units_list(units: &[Units]) -> String {
    units
        .iter()
        .enumerate()
        .map(|(j, u)| format!("R{}={u}", j + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_matrix(f: &mut fmt::Formatter<'_>, title: &str, rows: &[Vec<Units>]) -> fmt::Result {
    writeln!(f, "\n{title}")?;
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(Units::to_string).collect();
        writeln!(f, "  P{}: [{}]", i + 1, cells.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for SafetyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Processes: {}", self.state.num_processes())?;
        writeln!(f, "Number of Resources: {}", self.state.num_resources())?;
        writeln!(f, "Resource Instances: [{}]", units_list(&self.state.resources))?;
        writeln!(f, "Available Resources: [{}]", units_list(&self.available))?;

        write_matrix(
            f,
            "Max Matrix (max resources each process may request):",
            &self.state.max,
        )?;
        write_matrix(f, "Allocation Matrix (currently allocated):", &self.state.allocation)?;
        write_matrix(f, "Need Matrix (Max - Allocation):", &self.need)?;

        if self.is_safe() {
            writeln!(f, "\nResult: NO DEADLOCK - System is in a SAFE STATE")?;
            let sequence: Vec<String> =
                self.safe_sequence.iter().map(|p| format!("P{}", p + 1)).collect();
            write!(f, "Safe Sequence: {}", sequence.join(" -> "))
        } else {
            writeln!(f, "\nResult: DEADLOCK DETECTED")?;
            writeln!(f, "Safe Sequence: No safe sequence (Deadlock detected)")?;
            let blocked: Vec<String> = self.blocked.iter().map(|p| format!("P{}", p + 1)).collect();
            write!(f, "Blocked Processes: {}", blocked.join(", "))
        }
    }
}
