use serde::{Deserialize, Serialize};

use crate::core::{TaskId, Ticks};

/// A CPU-bound process as entered by the user or loaded from a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Process {
    pub pid: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    #[serde(default)]
    pub priority: i32,
}

impl Process {
    pub fn new(pid: impl Into<String>, arrival: Ticks, burst: Ticks) -> Self {
        Self {
            pid: pid.into(),
            arrival,
            burst,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// One bar of the Gantt chart. `process` indexes the input process list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionInterval {
    pub process: TaskId,
    pub pid: String,
    pub start: Ticks,
    pub finish: Ticks,
}

impl ExecutionInterval {
    pub fn len(&self) -> Ticks {
        self.finish - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: i32,
    pub first_run: Ticks,
    pub completion: Ticks,
    pub turnaround: Ticks,
    pub wait: Ticks,
    pub response: Ticks,
}
