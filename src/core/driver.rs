use super::{
    event::SchedEvent,
    observer::Observer,
    state::{SimCtx, Slice, TaskId, TaskState},
};
use crate::scheduler::{CpuConfig, Scheduler};

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    // Tasks sorted by (arrival, input order); admitted front to back
    arrivals: Vec<TaskId>,
    arrival_cursor: usize,
    slices: Vec<Slice>,
    events: Vec<SchedEvent>,
    observer: Observer,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct SchedOutcome {
    pub slices: Vec<Slice>,
    pub tasks: Vec<super::Task>,
    pub events: Vec<SchedEvent>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut ctx: SimCtx, config: &CpuConfig) -> Self {
        let scheduler = S::init(&mut ctx, config);

        let mut arrivals: Vec<TaskId> = (0..ctx.tasks.len()).collect();
        arrivals.sort_by_key(|&id| (ctx.task(id).arrival, id));

        Self {
            ctx,
            scheduler,
            arrivals,
            arrival_cursor: 0,
            slices: Vec::new(),
            events: Vec::new(),
            observer: Observer::new(),
        }
    }

    /// Run until every task has completed.
    ///
    /// Each iteration either dispatches a task for at least one tick or jumps
    /// the clock forward to an arrival that has not been admitted yet, so the
    /// loop is bounded by the number of tasks plus their total burst.
    pub fn run(mut self) -> SchedOutcome {
        loop {
            self.admit_arrivals();
            if self.ctx.all_completed() {
                break;
            }

            match self.scheduler.dispatch(&mut self.ctx) {
                Some(task) => self.run_task(task),
                None => {
                    let Some(&next) = self.arrivals.get(self.arrival_cursor) else {
                        debug_assert!(false, "Ready queue drained with unfinished tasks");
                        break;
                    };
                    let from = self.ctx.now;
                    let until = self.ctx.task(next).arrival;
                    self.emit(SchedEvent::Idle { from, until });
                    self.ctx.jump_to(until);
                }
            }

            self.observer.observe(&self.ctx);
        }

        let slices = coalesce(self.slices);
        self.observer.finish(&self.ctx, &slices);

        SchedOutcome {
            slices,
            tasks: self.ctx.tasks,
            events: self.events,
        }
    }

    fn run_task(&mut self, task: TaskId) {
        let start = self.ctx.now;
        self.ctx.set_running(task);

        let ran_for = {
            let task = self.ctx.task_mut(task);
            let slice = task
                .allocated_slice
                .take()
                .unwrap_or(task.remaining)
                .max(1);
            let ran_for = slice.min(task.remaining);
            task.remaining -= ran_for;
            ran_for
        };

        self.ctx.advance_time(ran_for);
        let finish = self.ctx.now;
        self.slices.push(Slice {
            task,
            start,
            finish,
        });
        self.emit(SchedEvent::Dispatched {
            task,
            at: start,
            ran_for,
        });

        // Arrivals during the slice queue up ahead of the preempted task
        self.admit_arrivals();
        self.ctx.clear_running();

        if self.ctx.task(task).remaining == 0 {
            self.ctx.mark_completed(task, finish);
            self.emit(SchedEvent::Completed { task, at: finish });
        } else {
            self.ctx.mark_ready(task);
            self.emit(SchedEvent::Preempted { task, at: finish });
            self.enqueue(task);
        }
    }

    fn admit_arrivals(&mut self) {
        let now = self.ctx.now;
        while let Some(&task) = self.arrivals.get(self.arrival_cursor) {
            if self.ctx.task(task).arrival > now {
                break;
            }
            self.arrival_cursor += 1;

            debug_assert_eq!(self.ctx.task(task).state, TaskState::Pending);
            self.ctx.mark_ready(task);
            let at = self.ctx.task(task).arrival;
            self.emit(SchedEvent::Arrived { task, at });
            self.enqueue(task);
        }
    }

    fn enqueue(&mut self, task: TaskId) {
        self.scheduler.enqueue(&mut self.ctx, task);
    }

    fn emit(&mut self, event: SchedEvent) {
        tracing::trace!(now = self.ctx.now, ?event, "sched event");
        self.events.push(event);
    }
}

/// Merge back-to-back slices of the same task into one.
pub fn coalesce(slices: Vec<Slice>) -> Vec<Slice> {
    let mut merged: Vec<Slice> = Vec::with_capacity(slices.len());
    for slice in slices {
        match merged.last_mut() {
            Some(last) if last.task == slice.task && last.finish == slice.start => {
                last.finish = slice.finish;
            }
            _ => merged.push(slice),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Ticks;
    use crate::scheduler::{Algorithm, FcfsScheduler, RoundRobinScheduler};

    fn ctx_with(tasks: &[(Ticks, Ticks)]) -> SimCtx {
        let mut ctx = SimCtx::new();
        for &(arrival, burst) in tasks {
            ctx.create_task(arrival, burst, 0);
        }
        ctx
    }

    #[test]
    fn idle_gap_jumps_to_next_arrival() {
        let ctx = ctx_with(&[(0, 2), (10, 1)]);
        let outcome = SchedCore::<FcfsScheduler>::new(ctx, &CpuConfig::new(Algorithm::Fcfs, None).unwrap()).run();

        assert!(
            outcome
                .events
                .contains(&SchedEvent::Idle { from: 2, until: 10 })
        );
        assert_eq!(outcome.slices.last().map(|s| s.finish), Some(11));
    }

    #[test]
    fn lone_round_robin_task_is_one_slice() {
        let ctx = ctx_with(&[(0, 5)]);
        let config = CpuConfig::new(Algorithm::RoundRobin, Some(2)).unwrap();
        let outcome = SchedCore::<RoundRobinScheduler>::new(ctx, &config).run();

        assert_eq!(
            outcome.slices,
            vec![Slice {
                task: 0,
                start: 0,
                finish: 5
            }]
        );
        let preemptions = outcome
            .events
            .iter()
            .filter(|e| matches!(e, SchedEvent::Preempted { .. }))
            .count();
        assert_eq!(preemptions, 2);
    }

    #[test]
    fn coalesce_keeps_gaps_and_switches() {
        let raw = vec![
            Slice { task: 0, start: 0, finish: 1 },
            Slice { task: 0, start: 1, finish: 2 },
            Slice { task: 1, start: 2, finish: 3 },
            Slice { task: 1, start: 4, finish: 5 },
        ];
        assert_eq!(
            coalesce(raw),
            vec![
                Slice { task: 0, start: 0, finish: 2 },
                Slice { task: 1, start: 2, finish: 3 },
                Slice { task: 1, start: 4, finish: 5 },
            ]
        );
    }
}
