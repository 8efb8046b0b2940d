use super::{CpuConfig, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Rank, Ticks};

// Re-decide after every tick
const SRTF_SLICE: Ticks = 1;

/// Preemptive shortest remaining time first.
///
/// Every dispatch runs a single tick, after which the task is re-ranked by
/// what it has left. The driver merges the resulting unit slices.
pub struct SrtfScheduler {
    queue: DsqId,
}

impl Scheduler for SrtfScheduler {
    fn init(ctx: &mut SimCtx, _config: &CpuConfig) -> Self {
        Self {
            queue: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId) {
        let rank = Rank::ticks(ctx.task(task).remaining, task);
        ctx.dsq_push_priq(self.queue, task, SRTF_SLICE, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<TaskId> {
        ctx.dsq_pop(self.queue)
    }
}
