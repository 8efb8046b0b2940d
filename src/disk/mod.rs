pub mod sweep;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InputError, Result};

pub type Cylinder = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiskAlgorithm {
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "SSTF")]
    Sstf,
    #[serde(rename = "SCAN")]
    Scan,
    #[serde(rename = "C-SCAN")]
    CScan,
    #[serde(rename = "LOOK")]
    Look,
    #[serde(rename = "C-LOOK")]
    CLook,
}

impl DiskAlgorithm {
    pub const ALL: [DiskAlgorithm; 6] = [
        Self::Fcfs,
        Self::Sstf,
        Self::Scan,
        Self::CScan,
        Self::Look,
        Self::CLook,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sstf => "SSTF",
            Self::Scan => "SCAN",
            Self::CScan => "C-SCAN",
            Self::Look => "LOOK",
            Self::CLook => "C-LOOK",
        }
    }

    pub fn uses_direction(self) -> bool {
        !matches!(self, Self::Fcfs | Self::Sstf)
    }
}

impl fmt::Display for DiskAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiskAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "sstf" => Ok(Self::Sstf),
            "scan" => Ok(Self::Scan),
            "cscan" => Ok(Self::CScan),
            "look" => Ok(Self::Look),
            "clook" => Ok(Self::CLook),
            _ => Err(ConfigError::UnknownDiskAlgorithm(s.to_owned())),
        }
    }
}

/// Initial arm movement for the sweeping algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the last cylinder.
    #[default]
    Up,
    /// Toward cylinder 0.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "right" | "high" | "increasing" => Ok(Self::Up),
            "down" | "left" | "low" | "decreasing" => Ok(Self::Down),
            _ => Err(ConfigError::UnknownDirection(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskConfig {
    pub algorithm: DiskAlgorithm,
    pub head: Cylinder,
    pub last_cylinder: Cylinder,
    #[serde(default)]
    pub direction: Direction,
}

impl DiskConfig {
    pub fn new(algorithm: DiskAlgorithm, head: Cylinder, last_cylinder: Cylinder) -> Self {
        Self {
            algorithm,
            head,
            last_cylinder,
            direction: Direction::default(),
        }
    }

    pub fn heading(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeekPlan {
    pub config: DiskConfig,
    pub requests: Vec<Cylinder>,
    /// Head position first, then every cylinder the arm stops or turns at.
    pub traversal: Vec<Cylinder>,
    pub seek_time: u64,
}

/// Serve `requests` under `config` and measure the arm travel.
pub fn compute_seek(requests: &[Cylinder], config: &DiskConfig) -> Result<SeekPlan> {
    validate(requests, config)?;

    let traversal = sweep::traverse(requests, config);
    let seek_time = seek_distance(&traversal);
    tracing::debug!(
        algorithm = config.algorithm.name(),
        requests = requests.len(),
        seek_time,
        "computed disk schedule"
    );

    Ok(SeekPlan {
        config: *config,
        requests: requests.to_vec(),
        traversal,
        seek_time,
    })
}

/// Seek time of every algorithm on the same queue, head and direction.
pub fn compare_all(requests: &[Cylinder], config: &DiskConfig) -> Result<Vec<(DiskAlgorithm, u64)>> {
    validate(requests, config)?;

    Ok(DiskAlgorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let config = DiskConfig { algorithm, ..*config };
            (algorithm, seek_distance(&sweep::traverse(requests, &config)))
        })
        .collect())
}

fn validate(requests: &[Cylinder], config: &DiskConfig) -> Result<()> {
    if requests.is_empty() {
        return Err(InputError::NoRequests.into());
    }
    let last = config.last_cylinder;
    if let Some(&cylinder) = std::iter::once(&config.head)
        .chain(requests)
        .find(|&&c| c > last)
    {
        return Err(InputError::CylinderOutOfRange { cylinder, last }.into());
    }
    Ok(())
}

pub fn seek_distance(traversal: &[Cylinder]) -> u64 {
    traversal.windows(2).map(|w| w[0].abs_diff(w[1])).sum()
}

impl fmt::Display for SeekPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |cylinders: &[Cylinder], sep: &str| {
            cylinders
                .iter()
                .map(Cylinder::to_string)
                .collect::<Vec<_>>()
                .join(sep)
        };

        writeln!(f, "Algorithm: {}", self.config.algorithm)?;
        writeln!(f, "Initial Cylinder: {}", self.config.head)?;
        writeln!(f, "Last Cylinder: {}", self.config.last_cylinder)?;
        if self.config.algorithm.uses_direction() {
            writeln!(f, "Direction: {}", self.config.direction)?;
        }
        writeln!(f, "Request Queue: {}", join(&self.requests, ", "))?;
        writeln!(f, "\nTraversal Order: {}", join(&self.traversal, " -> "))?;
        write!(f, "Total Seek Time: {} cylinders", self.seek_time)
    }
}
