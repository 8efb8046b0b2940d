use std::num::NonZeroU64;

use super::{CpuConfig, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Ticks};

pub struct RoundRobinScheduler {
    queue: DsqId,
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    fn init(ctx: &mut SimCtx, config: &CpuConfig) -> Self {
        debug_assert!(
            config.quantum().is_some(),
            "Round robin config must carry a quantum"
        );
        Self {
            queue: ctx.create_dsq_fifo(),
            quantum: config.quantum().unwrap_or(NonZeroU64::MIN.get()),
        }
    }

    // Preempted tasks go to the back. The driver admits everything that
    // arrived during the slice before calling this, so newcomers queue first.
    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId) {
        ctx.dsq_push_fifo(self.queue, task, self.quantum);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.dsq_pop(self.queue)
    }
}
