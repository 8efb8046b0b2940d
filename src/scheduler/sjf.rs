use super::{CpuConfig, SLICE_UNBOUNDED, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Rank};

/// Non-preemptive shortest job first, keyed on the full burst.
pub struct SjfScheduler {
    queue: DsqId,
}

impl Scheduler for SjfScheduler {
    fn init(ctx: &mut SimCtx, _config: &CpuConfig) -> Self {
        Self {
            queue: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId) {
        let rank = Rank::ticks(ctx.task(task).burst, task);
        ctx.dsq_push_priq(self.queue, task, SLICE_UNBOUNDED, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.dsq_pop(self.queue)
    }
}
