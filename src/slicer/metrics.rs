//! Scheduler metrics.
//!
//! Atomic counters describing scheduler activity, shared via `Arc` so
//! hosts can watch a scheduler they hand ticks to. All counters use
//! relaxed ordering; values are monotonic and eventually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    /// Increments the counter by 1.
    pub(crate) fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Returns the counter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Counters describing one scheduler's activity.
#[derive(Debug)]
pub struct SlicerMetrics {
    ticks: Counter,
    resumes: Counter,
    cancelled: Counter,
    task_panics: Counter,
    action_panics: Counter,
    cleanup_actions: Counter,
    alloc_actions: Counter,
    budget_interrupts: Counter,
}

impl SlicerMetrics {
    pub(crate) fn new() -> Self {
        Self {
            ticks: Counter::new("slicer.ticks"),
            resumes: Counter::new("slicer.resumes"),
            cancelled: Counter::new("slicer.cancelled"),
            task_panics: Counter::new("slicer.task_panics"),
            action_panics: Counter::new("slicer.action_panics"),
            cleanup_actions: Counter::new("slicer.cleanup_actions"),
            alloc_actions: Counter::new("slicer.alloc_actions"),
            budget_interrupts: Counter::new("slicer.budget_interrupts"),
        }
    }

    /// Ticks started, including ticks skipped for lack of budget.
    #[must_use]
    pub fn ticks(&self) -> &Counter {
        &self.ticks
    }

    /// Task resumes, including the resume that removes a task.
    #[must_use]
    pub fn resumes(&self) -> &Counter {
        &self.resumes
    }

    /// Tasks removed from the queue, whether by yield, explicit cancel, or
    /// panic.
    #[must_use]
    pub fn cancelled(&self) -> &Counter {
        &self.cancelled
    }

    /// Panics caught while resuming a task.
    #[must_use]
    pub fn task_panics(&self) -> &Counter {
        &self.task_panics
    }

    /// Panics caught while running a posted action.
    #[must_use]
    pub fn action_panics(&self) -> &Counter {
        &self.action_panics
    }

    /// Cleanup-lane actions executed.
    #[must_use]
    pub fn cleanup_actions(&self) -> &Counter {
        &self.cleanup_actions
    }

    /// Alloc-lane actions executed.
    #[must_use]
    pub fn alloc_actions(&self) -> &Counter {
        &self.alloc_actions
    }

    /// Times a drain or slicing pass stopped because the budget was spent.
    #[must_use]
    pub fn budget_interrupts(&self) -> &Counter {
        &self.budget_interrupts
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.increment();
    }

    pub(crate) fn record_resume(&self) {
        self.resumes.increment();
    }

    pub(crate) fn record_cancelled(&self) {
        self.cancelled.increment();
    }

    pub(crate) fn record_task_panic(&self) {
        self.task_panics.increment();
    }

    pub(crate) fn record_action_panic(&self) {
        self.action_panics.increment();
    }

    pub(crate) fn record_cleanup_action(&self) {
        self.cleanup_actions.increment();
    }

    pub(crate) fn record_alloc_action(&self) {
        self.alloc_actions.increment();
    }

    pub(crate) fn record_budget_interrupt(&self) {
        self.budget_interrupts.increment();
    }

    /// A point-in-time copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.get(),
            resumes: self.resumes.get(),
            cancelled: self.cancelled.get(),
            task_panics: self.task_panics.get(),
            action_panics: self.action_panics.get(),
            cleanup_actions: self.cleanup_actions.get(),
            alloc_actions: self.alloc_actions.get(),
            budget_interrupts: self.budget_interrupts.get(),
        }
    }
}

impl Default for SlicerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`SlicerMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Ticks started.
    pub ticks: u64,
    /// Task resumes.
    pub resumes: u64,
    /// Tasks removed from the queue.
    pub cancelled: u64,
    /// Panics caught while resuming tasks.
    pub task_panics: u64,
    /// Panics caught while running posted actions.
    pub action_panics: u64,
    /// Cleanup-lane actions executed.
    pub cleanup_actions: u64,
    /// Alloc-lane actions executed.
    pub alloc_actions: u64,
    /// Budget-exhaustion interrupts.
    pub budget_interrupts: u64,
}
