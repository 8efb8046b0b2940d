use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into the caller's process list
pub type TaskId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct DsqId;
}

/// Ready-queue ordering key. The smallest `(key, order)` pair runs first, so
/// equal keys fall back to input order.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Rank {
    pub key: i64,
    pub order: TaskId,
}

impl Rank {
    pub fn ticks(ticks: Ticks, order: TaskId) -> Self {
        Self {
            key: i64::try_from(ticks).unwrap_or(i64::MAX),
            order,
        }
    }

    pub fn priority(priority: i32, order: TaskId) -> Self {
        Self {
            key: i64::from(priority),
            order,
        }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.key, other.order).cmp(&(self.key, self.order))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    // Not yet arrived
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub state: TaskState,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub remaining: Ticks,
    pub priority: i32,
    pub allocated_slice: Option<Ticks>,
    pub first_run: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

/// One contiguous stretch of CPU time given to a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub task: TaskId,
    pub start: Ticks,
    pub finish: Ticks,
}

impl Slice {
    pub fn len(&self) -> Ticks {
        self.finish - self.start
    }
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, Rank>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.iter().any(|t| *t.0 == task_id),
        }
    }
}

/// Mutable state of a single schedule computation.
///
/// A fresh context is built for every call, so `remaining` always starts
/// from `burst` and nothing leaks between computations.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub running: Option<TaskId>,
    pub tasks: Vec<Task>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<TaskId, DsqId>,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            running: None,
            tasks: Vec::new(),
            dsqs: SlotMap::with_key(),
            task_to_dsq: FxHashMap::default(),
        }
    }

    pub fn create_task(&mut self, arrival: Ticks, burst: Ticks, priority: i32) -> TaskId {
        let id = self.tasks.len();
        self.tasks.push(Task {
            id,
            state: TaskState::Pending,
            arrival,
            burst,
            remaining: burst,
            priority,
            allocated_slice: None,
            first_run: None,
            completion_time: None,
        });
        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn jump_to(&mut self, at: Ticks) {
        debug_assert!(at >= self.now, "Clock must never move backwards");
        self.now = self.now.max(at);
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks, rank: Option<Rank>) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Task {task_id} already present in some DSQ"
        );

        let task = self.task_mut(task_id);
        debug_assert_eq!(
            task.state,
            TaskState::Ready,
            "Task {task_id} must be Ready when enqueued"
        );
        task.allocated_slice = Some(slice);

        let Some(dsq) = self.dsqs.get_mut(dsq_id) else {
            debug_assert!(false, "Unknown DSQ {dsq_id:?}");
            return;
        };

        match (dsq, rank) {
            (Dsq::Fifo { tasks }, _) => tasks.push_back(task_id),
            (Dsq::Priq { tasks }, Some(rank)) => {
                tasks.push(task_id, rank);
            }
            (Dsq::Priq { tasks }, None) => {
                debug_assert!(false, "Attempted to push to a priority DSQ with no rank");
                tasks.push(task_id, Rank::ticks(Ticks::MAX, task_id));
            }
        };

        self.task_to_dsq.insert(task_id, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks) {
        self.dsq_push(dsq_id, task_id, slice, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks, rank: Rank) {
        self.dsq_push(dsq_id, task_id, slice, Some(rank));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<TaskId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let task = match dsq {
            Dsq::Fifo { tasks } => tasks.pop_front(),
            Dsq::Priq { tasks } => tasks.pop().map(|t| t.0),
        }?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some(task)
    }

    pub fn task_in_any_dsq(&self, task_id: TaskId) -> bool {
        self.task_to_dsq.contains_key(&task_id)
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn all_completed(&self) -> bool {
        self.tasks.iter().all(|t| t.state == TaskState::Completed)
    }

    pub fn mark_ready(&mut self, task_id: TaskId) {
        let task = self.task_mut(task_id);
        debug_assert!(
            task.state != TaskState::Completed,
            "Completed task {task_id} cannot be ready"
        );
        task.state = TaskState::Ready;
    }

    pub fn set_running(&mut self, task_id: TaskId) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a task");

        let now = self.now;
        self.running = Some(task_id);
        let task = self.task_mut(task_id);
        task.state = TaskState::Running;
        task.first_run.get_or_insert(now);
    }

    pub fn clear_running(&mut self) {
        self.running = None;
    }

    pub fn mark_completed(&mut self, task_id: TaskId, completion_time: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );

        let task = &mut self.tasks[task_id];
        debug_assert_eq!(
            task.remaining, 0,
            "Task {task_id} completed with service left"
        );

        task.state = TaskState::Completed;
        task.completion_time = Some(completion_time);
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}
