use super::{CpuConfig, SLICE_UNBOUNDED, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Rank};

/// Non-preemptive priority scheduling. Lower values run first.
pub struct PriorityScheduler {
    queue: DsqId,
}

impl Scheduler for PriorityScheduler {
    fn init(ctx: &mut SimCtx, _config: &CpuConfig) -> Self {
        Self {
            queue: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId) {
        let rank = Rank::priority(ctx.task(task).priority, task);
        ctx.dsq_push_priq(self.queue, task, SLICE_UNBOUNDED, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.dsq_pop(self.queue)
    }
}
