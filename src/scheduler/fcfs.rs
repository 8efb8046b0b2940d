use super::{CpuConfig, SLICE_UNBOUNDED, Scheduler, SimCtx, TaskId};
use crate::core::DsqId;

/// Arrival order, run to completion. The driver admits simultaneous
/// arrivals in input order, so the FIFO inherits that tie-break.
pub struct FcfsScheduler {
    queue: DsqId,
}

impl Scheduler for FcfsScheduler {
    fn init(ctx: &mut SimCtx, _config: &CpuConfig) -> Self {
        Self {
            queue: ctx.create_dsq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId) {
        ctx.dsq_push_fifo(self.queue, task, SLICE_UNBOUNDED);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.dsq_pop(self.queue)
    }
}
