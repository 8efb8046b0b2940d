use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything an engine call can reject.
///
/// Unallocatable processes and failed verifications are ordinary results and
/// never show up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("malformed question payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Unknown selectors or missing parameters. Never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown scheduling algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("unknown allocation policy `{0}`")]
    UnknownPolicy(String),

    #[error("unknown disk scheduling algorithm `{0}`")]
    UnknownDiskAlgorithm(String),

    #[error("unknown head direction `{0}`")]
    UnknownDirection(String),

    #[error("round robin requires a time quantum")]
    MissingQuantum,

    #[error("time quantum must be at least 1")]
    ZeroQuantum,
}

/// Malformed problem instances, rejected before any simulation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no processes to schedule")]
    NoProcesses,

    #[error("no disk requests to serve")]
    NoRequests,

    #[error("process `{pid}` has a zero burst time")]
    ZeroBurst { pid: String },

    #[error("duplicate process id `{0}`")]
    DuplicateId(String),

    #[error("latest arrival plus total burst time does not fit the clock")]
    ClockOverflow,

    #[error("question declares {declared} processes but lists {listed}")]
    ProcessCountMismatch { declared: usize, listed: usize },

    #[error("hole {index} has zero size")]
    ZeroHoleSize { index: usize },

    #[error("process `{pid}` requests zero memory")]
    ZeroProcessSize { pid: String },

    #[error("hole sizes add up to more than the address space")]
    MemoryOverflow,

    #[error("cylinder {cylinder} lies beyond the last cylinder {last}")]
    CylinderOutOfRange { cylinder: u64, last: u64 },

    #[error("no resource types given")]
    NoResources,

    #[error("max has {max} rows but allocation has {allocation}")]
    RowCountMismatch { max: usize, allocation: usize },

    #[error("{matrix} row of P{} has {len} columns, expected {expected}", .process + 1)]
    RowWidth {
        matrix: &'static str,
        process: usize,
        len: usize,
        expected: usize,
    },

    #[error("P{} holds more of R{} than it may ever claim", .process + 1, .resource + 1)]
    AllocationExceedsMax { process: usize, resource: usize },

    #[error("allocations of R{} exceed its {total} instances", .resource + 1)]
    OverAllocated { resource: usize, total: u64 },

    #[error("submitted answer has {submitted} cells, expected {expected}")]
    LengthMismatch { expected: usize, submitted: usize },

    #[error("answer cell {index} holds {value}, which is neither a process index nor -1")]
    InvalidCell { index: usize, value: i64 },
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Payload(_))
    }
}
