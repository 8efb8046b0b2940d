use std::fmt;

use average::Estimate;
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::process::{ExecutionInterval, Process, ProcessMetrics};
use crate::{
    core::{SchedCore, SchedEvent, SchedOutcome, SimCtx, Task, Ticks},
    error::{InputError, Result},
    scheduler::{
        Algorithm, CpuConfig, FcfsScheduler, PriorityScheduler, RoundRobinScheduler,
        SjfScheduler, SrtfScheduler,
    },
    verify::Slot,
};

/// Length of the answer grid the student fills in.
pub const DEFAULT_TIMELINE_LEN: usize = 30;

/// Canonical result of one scheduling problem.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub config: CpuConfig,
    pub processes: Vec<Process>,
    pub timeline: Vec<ExecutionInterval>,
    pub metrics: Vec<ProcessMetrics>,
    pub average_wait: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
    pub makespan: Ticks,
    #[serde(skip)]
    pub events: Vec<SchedEvent>,
}

/// Compute the reference timeline for `processes` under `config`.
///
/// Every call simulates from scratch on its own context, so identical
/// inputs always yield identical schedules.
pub fn compute_schedule(processes: &[Process], config: &CpuConfig) -> Result<Schedule> {
    validate(processes)?;

    let mut ctx = SimCtx::new();
    for p in processes {
        ctx.create_task(p.arrival, p.burst, p.priority);
    }

    let outcome = match config.algorithm() {
        Algorithm::Fcfs => SchedCore::<FcfsScheduler>::new(ctx, config).run(),
        Algorithm::Sjf => SchedCore::<SjfScheduler>::new(ctx, config).run(),
        Algorithm::Srtf => SchedCore::<SrtfScheduler>::new(ctx, config).run(),
        Algorithm::Priority => SchedCore::<PriorityScheduler>::new(ctx, config).run(),
        Algorithm::RoundRobin => SchedCore::<RoundRobinScheduler>::new(ctx, config).run(),
    };

    let schedule = Schedule::from_outcome(processes, *config, outcome);
    tracing::debug!(
        algorithm = config.algorithm().name(),
        processes = processes.len(),
        intervals = schedule.timeline.len(),
        makespan = schedule.makespan,
        "computed schedule"
    );
    Ok(schedule)
}

fn validate(processes: &[Process]) -> Result<()> {
    if processes.is_empty() {
        return Err(InputError::NoProcesses.into());
    }

    let mut seen = FxHashSet::default();
    for p in processes {
        if p.burst == 0 {
            return Err(InputError::ZeroBurst { pid: p.pid.clone() }.into());
        }
        if !seen.insert(p.pid.as_str()) {
            return Err(InputError::DuplicateId(p.pid.clone()).into());
        }
    }

    // The clock can never pass the latest arrival plus all the work
    let latest = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
    processes
        .iter()
        .try_fold(latest, |end, p| end.checked_add(p.burst))
        .ok_or(InputError::ClockOverflow)?;
    Ok(())
}

impl Schedule {
    fn from_outcome(processes: &[Process], config: CpuConfig, outcome: SchedOutcome) -> Self {
        let SchedOutcome {
            slices,
            tasks,
            events,
        } = outcome;

        let timeline = slices
            .iter()
            .map(|s| ExecutionInterval {
                process: s.task,
                pid: processes[s.task].pid.clone(),
                start: s.start,
                finish: s.finish,
            })
            .collect();

        let metrics: Vec<ProcessMetrics> = processes
            .iter()
            .zip(&tasks)
            .map(|(p, task)| metrics_for(p, task))
            .collect();

        Self {
            config,
            processes: processes.to_vec(),
            timeline,
            average_wait: avg(metrics.iter().map(|m| m.wait as f64)),
            average_turnaround: avg(metrics.iter().map(|m| m.turnaround as f64)),
            average_response: avg(metrics.iter().map(|m| m.response as f64)),
            makespan: metrics.iter().map(|m| m.completion).max().unwrap_or(0),
            metrics,
            events,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm()
    }

    /// Project the timeline onto a grid of `len` unit cells.
    ///
    /// Cells past the end of the grid are dropped; cells nobody runs in stay
    /// `None`.
    pub fn dense(&self, len: usize) -> Vec<Slot> {
        let mut cells = vec![None; len];
        for interval in &self.timeline {
            let start = usize::try_from(interval.start).unwrap_or(usize::MAX).min(len);
            let finish = usize::try_from(interval.finish).unwrap_or(usize::MAX).min(len);
            cells[start..finish].fill(Some(interval.process));
        }
        cells
    }

    /// The answer grid students are scored against.
    pub fn canonical_answer(&self) -> Vec<Slot> {
        self.dense(DEFAULT_TIMELINE_LEN)
    }

    pub fn metrics_of(&self, pid: &str) -> Option<&ProcessMetrics> {
        self.metrics.iter().find(|m| m.pid == pid)
    }

    /// Ticks in `[0, makespan)` where the CPU had nothing to run.
    pub fn idle_time(&self) -> Ticks {
        let busy: Ticks = self.timeline.iter().map(ExecutionInterval::len).sum();
        self.makespan - busy
    }

    /// Number of times the CPU switched from one process to another.
    pub fn context_switches(&self) -> usize {
        self.timeline
            .windows(2)
            .filter(|w| w[0].process != w[1].process)
            .count()
    }
}

fn metrics_for(p: &Process, task: &Task) -> ProcessMetrics {
    debug_assert!(task.completion_time.is_some(), "Task {} never completed", task.id);
    let completion = task.completion_time.unwrap_or(p.arrival + p.burst);
    let first_run = task.first_run.unwrap_or(p.arrival);
    let turnaround = completion - p.arrival;

    ProcessMetrics {
        pid: p.pid.clone(),
        arrival: p.arrival,
        burst: p.burst,
        priority: p.priority,
        first_run,
        completion,
        turnaround,
        wait: turnaround - p.burst,
        response: first_run - p.arrival,
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = self.algorithm();
        writeln!(f, "Algorithm: {algorithm} ({})", algorithm.name())?;
        if let Some(quantum) = self.config.quantum() {
            writeln!(f, "Time Quantum: {quantum}")?;
        }

        writeln!(f, "\nProcesses:")?;
        for p in &self.processes {
            write!(f, "  {}: Arrival={}, Burst={}", p.pid, p.arrival, p.burst)?;
            if algorithm == Algorithm::Priority {
                write!(f, ", Priority={}", p.priority)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nExecution Timeline (Gantt Chart order):")?;
        for i in &self.timeline {
            writeln!(f, "  {} -> t={} to t={}", i.pid, i.start, i.finish)?;
        }

        writeln!(f, "\nPer-Process Metrics:")?;
        for m in &self.metrics {
            writeln!(
                f,
                "  {}: Wait={}, Turnaround={}, Completion={}",
                m.pid, m.wait, m.turnaround, m.completion
            )?;
        }

        writeln!(f, "\nAverage Wait Time: {:.2}", self.average_wait)?;
        write!(f, "Average Turnaround Time: {:.2}", self.average_turnaround)
    }
}
