//! Periodic task scheduling
//!
//! The session never touches wall-clock timers. It registers tasks with a
//! [`Scheduler`] and the host pushes time forward; tests do the same with
//! exact durations.

use std::time::Duration;

/// Work the session knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Update + render one frame
    Frame,
    /// One-shot delay after Start, then periodic enemy spawning begins
    BeginSpawning,
    /// Spawn one enemy
    SpawnEnemy,
}

/// Handle to a registered task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

pub trait Scheduler {
    /// Current scheduler time
    fn now(&self) -> Duration;

    /// Run `task` every `period`, first after `first_delay`
    fn register_periodic(&mut self, task: Task, first_delay: Duration, period: Duration)
    -> TaskHandle;

    /// Run `task` once after `delay`
    fn register_once(&mut self, task: Task, delay: Duration) -> TaskHandle;

    /// Cancel a task. Returns false if it already ran or was cancelled.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Pop the earliest task due at or before `until`, moving the clock to its
    /// due time. Ties run in registration order.
    fn next_due(&mut self, until: Duration) -> Option<Task>;

    /// Move the clock forward without running anything
    fn advance_to(&mut self, until: Duration);
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TaskHandle,
    task: Task,
    due: Duration,
    period: Option<Duration>,
}

/// Scheduler on a clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    entries: Vec<Entry>,
    next_handle: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not yet finished or cancelled) tasks
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_registered(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    fn push(&mut self, task: Task, delay: Duration, period: Option<Duration>) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            task,
            due: self.now + delay,
            period,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn register_periodic(
        &mut self,
        task: Task,
        first_delay: Duration,
        period: Duration,
    ) -> TaskHandle {
        // A zero period would never let the clock move past it
        let period = period.max(Duration::from_nanos(1));
        self.push(task, first_delay, Some(period))
    }

    fn register_once(&mut self, task: Task, delay: Duration) -> TaskHandle {
        self.push(task, delay, None)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    fn next_due(&mut self, until: Duration) -> Option<Task> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(i, _)| i)?;

        let due = self.entries[idx].due;
        let task = self.entries[idx].task;
        match self.entries[idx].period {
            Some(period) => self.entries[idx].due = due + period,
            None => {
                self.entries.remove(idx);
            }
        }
        self.now = self.now.max(due);
        Some(task)
    }

    fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
