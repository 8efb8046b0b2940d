use crate::core::{TaskId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedEvent {
    Arrived {
        task: TaskId,
        at: Ticks,
    },
    Dispatched {
        task: TaskId,
        at: Ticks,
        ran_for: Ticks,
    },
    // Slice expired with service left; the task went back to its queue
    Preempted {
        task: TaskId,
        at: Ticks,
    },
    Completed {
        task: TaskId,
        at: Ticks,
    },
    // Ready queue empty; clock jumped to the next arrival
    Idle {
        from: Ticks,
        until: Ticks,
    },
}
