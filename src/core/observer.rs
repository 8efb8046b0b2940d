use rustc_hash::FxHashMap;

use super::state::{SimCtx, Slice, TaskId, TaskState, Ticks};

/// Debug-build invariant checks over a running simulation and its timeline.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        debug_assert!(
            ctx.running.is_none(),
            "CPU still claims a task after step {}",
            self.step
        );

        for task in &ctx.tasks {
            debug_assert!(
                task.remaining <= task.burst,
                "Task {} has more service left than its burst",
                task.id
            );
            if task.state == TaskState::Ready {
                debug_assert!(
                    ctx.task_in_any_dsq(task.id),
                    "Ready task {} must sit in a DSQ",
                    task.id
                );
            }
        }

        for (&task_id, &dsq_id) in &ctx.task_to_dsq {
            let task = ctx.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Ready,
                "Task {task_id} in DSQ {dsq_id:?} must be Ready"
            );
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(task_id),
                    "task_to_dsq claims task {task_id} in DSQ {dsq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "task_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }
    }

    /// Final timeline checks: ordered, non-overlapping, coalesced, and every
    /// task served exactly its burst.
    pub fn finish(&self, ctx: &SimCtx, slices: &[Slice]) {
        let mut served: FxHashMap<TaskId, Ticks> = FxHashMap::default();

        for slice in slices {
            debug_assert!(slice.finish > slice.start, "Empty slice {slice:?}");
            *served.entry(slice.task).or_default() += slice.len();
        }

        for pair in slices.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            debug_assert!(
                prev.finish <= next.start,
                "Slices overlap: {prev:?} then {next:?}"
            );
            debug_assert!(
                !(prev.task == next.task && prev.finish == next.start),
                "Slices {prev:?} and {next:?} should have been merged"
            );
        }

        for task in &ctx.tasks {
            debug_assert_eq!(task.state, TaskState::Completed);
            debug_assert_eq!(
                served.get(&task.id).copied().unwrap_or(0),
                task.burst,
                "Task {} served time differs from its burst",
                task.id
            );
            let last_finish = slices
                .iter()
                .rev()
                .find(|s| s.task == task.id)
                .map(|s| s.finish);
            debug_assert_eq!(task.completion_time, last_finish);
        }
    }
}
