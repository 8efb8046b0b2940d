pub mod fit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::verify::Slot;
pub use fit::compute_allocation;

pub type Size = u64;
pub type HoleId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hole {
    pub size: Size,
}

impl Hole {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryProcess {
    pub pid: String,
    pub size: Size,
}

impl MemoryProcess {
    pub fn new(pid: impl Into<String>, size: Size) -> Self {
        Self {
            pid: pid.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Self::FirstFit, Self::BestFit, Self::WorstFit];

    pub fn name(self) -> &'static str {
        match self {
            Self::FirstFit => "FirstFit",
            Self::BestFit => "BestFit",
            Self::WorstFit => "WorstFit",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstFit => "First Fit",
            Self::BestFit => "Best Fit",
            Self::WorstFit => "Worst Fit",
        })
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "firstfit" | "first" => Ok(Self::FirstFit),
            "bestfit" | "best" => Ok(Self::BestFit),
            "worstfit" | "worst" => Ok(Self::WorstFit),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// Result of placing every process, in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub policy: Policy,
    pub holes: Vec<Hole>,
    pub processes: Vec<MemoryProcess>,
    /// Hole chosen for each process, `None` if it did not fit anywhere.
    pub by_process: Vec<Option<HoleId>>,
    /// Process placed in each hole.
    pub by_hole: Vec<Slot>,
}

/// One region of the final memory map, with holes laid out back to back from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub start: Size,
    pub end: Size,
    pub hole: HoleId,
    pub process: Option<usize>,
}

impl Allocation {
    /// The answer grid: one cell per hole.
    pub fn dense(&self) -> Vec<Slot> {
        self.by_hole.clone()
    }

    pub fn hole_of(&self, process: usize) -> Option<HoleId> {
        self.by_process.get(process).copied().flatten()
    }

    /// Processes that found no hole, in input order.
    pub fn unallocated(&self) -> impl Iterator<Item = &MemoryProcess> + '_ {
        self.processes
            .iter()
            .zip(&self.by_process)
            .filter(|(_, hole)| hole.is_none())
            .map(|(p, _)| p)
    }

    pub fn all_allocated(&self) -> bool {
        self.by_process.iter().all(Option::is_some)
    }

    /// Unused space inside `hole`, or its full size when it is free.
    pub fn leftover(&self, hole: HoleId) -> Size {
        let size = self.holes[hole].size;
        match self.by_hole[hole] {
            Some(p) => size - self.processes[p].size,
            None => size,
        }
    }

    /// Space lost inside occupied holes.
    pub fn total_leftover(&self) -> Size {
        (0..self.holes.len())
            .filter(|&h| self.by_hole[h].is_some())
            .map(|h| self.leftover(h))
            .sum()
    }

    pub fn layout(&self) -> Vec<Region> {
        let mut regions = Vec::new();
        let mut cursor: Size = 0;
        for (hole, h) in self.holes.iter().enumerate() {
            let end = cursor + h.size;
            match self.by_hole[hole] {
                Some(p) => {
                    let used = cursor + self.processes[p].size;
                    regions.push(Region {
                        start: cursor,
                        end: used,
                        hole,
                        process: Some(p),
                    });
                    if used < end {
                        regions.push(Region {
                            start: used,
                            end,
                            hole,
                            process: None,
                        });
                    }
                }
                None => regions.push(Region {
                    start: cursor,
                    end,
                    hole,
                    process: None,
                }),
            }
            cursor = end;
        }
        regions
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: Size = self.holes.iter().map(|h| h.size).sum();
        writeln!(f, "Algorithm: {}", self.policy)?;
        writeln!(f, "Total Memory Range: 0 to {total}")?;

        writeln!(f, "\nHoles (free memory blocks):")?;
        for (i, h) in self.holes.iter().enumerate() {
            writeln!(f, "  Block {}: size={}", i + 1, h.size)?;
        }

        writeln!(f, "\nProcesses to allocate:")?;
        for (p, hole) in self.processes.iter().zip(&self.by_process) {
            match hole {
                Some(h) => writeln!(
                    f,
                    "  {}: size={}, state=allocated, Block {}, leftover={}",
                    p.pid,
                    p.size,
                    h + 1,
                    self.leftover(*h)
                )?,
                None => writeln!(f, "  {}: size={}, state=failed", p.pid, p.size)?,
            }
        }

        let failed: Vec<&str> = self.unallocated().map(|p| p.pid.as_str()).collect();
        if failed.is_empty() {
            writeln!(f, "\nProcesses that FAILED to allocate: None")?;
        } else {
            writeln!(f, "\nProcesses that FAILED to allocate: {}", failed.join(", "))?;
        }

        write!(f, "\nFinal Memory Layout:")?;
        for region in self.layout() {
            let label = match region.process {
                Some(p) => self.processes[p].pid.as_str(),
                None => "hole",
            };
            write!(
                f,
                "\n  [{}-{}] {} (size={})",
                region.start,
                region.end,
                label,
                region.end - region.start
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("FirstFit".parse::<Policy>(), Ok(Policy::FirstFit));
        assert_eq!("bestfit".parse::<Policy>(), Ok(Policy::BestFit));
        assert_eq!("worst-fit".parse::<Policy>(), Ok(Policy::WorstFit));
        assert_eq!(
            "NextFit".parse::<Policy>(),
            Err(ConfigError::UnknownPolicy("NextFit".into()))
        );
    }
}
