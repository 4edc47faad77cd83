//! Deferred, cancellable actions keyed by dialog id.
//!
//! Focus moves into a dialog a short while after it opens so the dialog has
//! rendered first. Each dialog has at most one pending action; scheduling a
//! new one drops (and therefore cancels) the previous.

use std::collections::HashMap;

/// Runs a job after a delay. Dropping the returned task cancels it.
pub trait Scheduler {
    type Task;

    fn schedule(&self, delay_ms: u32, job: Box<dyn FnOnce()>) -> Self::Task;
}

/// Browser scheduler backed by `setTimeout`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

#[cfg(feature = "hydrate")]
impl Scheduler for TimeoutScheduler {
    type Task = gloo_timers::callback::Timeout;

    fn schedule(&self, delay_ms: u32, job: Box<dyn FnOnce()>) -> Self::Task {
        gloo_timers::callback::Timeout::new(delay_ms, job)
    }
}

/// One pending task per key.
pub struct PendingTasks<T> {
    tasks: HashMap<String, T>,
}

impl<T> Default for PendingTasks<T> {
    fn default() -> Self {
        Self { tasks: HashMap::new() }
    }
}

impl<T> PendingTasks<T> {
    /// Store `task` for `key`, cancelling whatever was pending there.
    pub fn replace(&mut self, key: &str, task: T) {
        self.tasks.insert(key.to_owned(), task);
    }

    pub fn cancel(&mut self, key: &str) {
        self.tasks.remove(key);
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}


#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;
