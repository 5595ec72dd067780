//! Cooperative slicer scheduler.
//!
//! The scheduler amortizes long-running, interruptible jobs across host
//! frames without blocking the frame loop. The host calls
//! [`Slicer::tick`] once per frame; each tick spends at most the
//! configured [`TickBudget`] on work, in three phases:
//!
//! 1. **Cleanup drain** — posted cleanup actions run first, stopping early
//!    if the budget runs out (the remainder keeps for the next tick).
//! 2. **Slicing pass** — queued tasks are resumed front to back. Each
//!    resume returns a [`StepResult`](crate::types::StepResult) applied as:
//!
//!    | Result | Queue effect | Tick effect |
//!    |--------|--------------|-------------|
//!    | `Continue` | none | re-resume the same task immediately |
//!    | `Hold` | none | stop the tick entirely |
//!    | `Wait` | none | advance to the next position |
//!    | `Delay` | move to the back | not revisited this tick |
//!    | `Stall` | move to the front | stop the tick entirely |
//!    | `Cancel` | remove | advance to the next position |
//!
//!    The scheduler budget-checks before each position, never between
//!    `Continue` re-resumes; a task looping on `Continue` owns its own
//!    budget discipline via [`TickContext::should_hold`].
//! 3. **Alloc drain** — posted alloc actions run only if the pass completed
//!    without `Hold`/`Stall` and budget remains, because alloc work is
//!    assumed to create more work than cleanup work retires.
//!
//! A panicking resume is caught, logged, and treated as `Cancel`.
//!
//! # Threading
//!
//! One logical consumer thread owns the [`Slicer`] and drives every resume;
//! tasks never run in parallel. Other threads interact only through
//! [`ActionPoster`], backed by lock-free MPSC queues. Actions run on the
//! consuming thread with mutable scheduler access, so deferred cancels and
//! follow-up scheduling need no synchronization; an action that calls
//! [`Slicer::tick`] back is a programmer error caught by assertion.

pub mod builder;
pub mod config;
pub mod env_config;
pub mod injector;
pub mod metrics;
mod queue;
pub mod task;

pub use builder::SlicerBuilder;
pub use config::SlicerConfig;
pub use injector::ActionPoster;
pub use metrics::{Counter, MetricsSnapshot, SlicerMetrics};
pub use task::{SliceTask, TickContext};

use crate::slicer::injector::{Action, ActionQueues};
use crate::slicer::queue::{Entry, WorkQueue};
use crate::tracing_compat::{debug, error, info, trace};
use crate::types::{SliceHandle, SliceId, StepResult, TickBudget};
use core::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why the slicing pass stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SliceExit {
    /// Every position was visited.
    Pass,
    /// The budget ran out mid-pass.
    Budget,
    /// A task yielded `Hold`.
    Hold,
    /// A task yielded `Stall`.
    Stall,
}

/// The cooperative slicer scheduler.
///
/// Owns the work queue, the per-tick budget, and the cross-thread action
/// queues. Owned and driven by a single thread; see the
/// [module docs](self) for the tick algorithm.
///
/// ```
/// use timeslice::{Slicer, StepResult, TickContext};
///
/// let mut slicer = Slicer::new();
/// let handle = slicer.schedule(|_cx: &TickContext| StepResult::Cancel);
/// assert!(slicer.is_scheduled(handle));
/// slicer.tick();
/// assert!(!slicer.is_scheduled(handle));
/// ```
pub struct Slicer {
    queue: WorkQueue,
    actions: Arc<ActionQueues>,
    budget: TickBudget,
    next_id: u64,
    in_tick: bool,
    metrics: Arc<SlicerMetrics>,
}

impl Slicer {
    /// Create a scheduler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SlicerConfig::default())
    }

    /// Create a scheduler from an explicit configuration.
    #[must_use]
    pub fn with_config(config: SlicerConfig) -> Self {
        Self {
            queue: WorkQueue::with_capacity(config.work_capacity),
            actions: Arc::new(ActionQueues::default()),
            budget: config.budget,
            next_id: 1,
            in_tick: false,
            metrics: Arc::new(SlicerMetrics::new()),
        }
    }

    /// Start building a scheduler.
    #[must_use]
    pub fn builder() -> SlicerBuilder {
        SlicerBuilder::new()
    }

    /// Registers a task at the back of the work queue.
    ///
    /// The task has not started; its first resume happens on a later
    /// [`tick`](Self::tick). Returns a handle usable for cancellation and
    /// status queries.
    pub fn schedule<T>(&mut self, task: T) -> SliceHandle
    where
        T: SliceTask + 'static,
    {
        self.schedule_boxed(Box::new(task))
    }

    /// Registers an already-boxed task at the back of the work queue.
    pub fn schedule_boxed(&mut self, task: Box<dyn SliceTask>) -> SliceHandle {
        let id = SliceId::new(self.next_id);
        self.next_id += 1;
        self.queue.push_back(Entry { id, task });
        debug!(id = %id, queued = self.queue.len(), "task scheduled");
        SliceHandle::new(id)
    }

    /// Removes a task from the queue, dropping its state.
    ///
    /// Returns whether a live task was removed; a stale handle is a no-op.
    /// Must not be called from inside a resume (the borrow checker enforces
    /// this); a task cancelling mid-tick yields
    /// [`StepResult::Cancel`] instead, or defers through
    /// [`post_cleanup`](Self::post_cleanup).
    pub fn cancel(&mut self, handle: SliceHandle) -> bool {
        match self.queue.remove(handle.id()) {
            Some(entry) => {
                drop(entry);
                self.metrics.record_cancelled();
                debug!(id = %handle.id(), "task cancelled");
                true
            }
            None => {
                trace!(id = %handle.id(), "cancel ignored: handle not live");
                false
            }
        }
    }

    /// Returns true while the handle's task is present in the queue.
    #[must_use]
    pub fn is_scheduled(&self, handle: SliceHandle) -> bool {
        self.queue.contains(handle.id())
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Number of posted actions not yet run, across both lanes.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.actions.cleanup_len() + self.actions.alloc_len()
    }

    /// Returns true while any task or posted action is outstanding.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty() || !self.actions.is_empty()
    }

    /// Queued task ids, front to back.
    #[must_use]
    pub fn queued(&self) -> Vec<SliceId> {
        self.queue.ids()
    }

    /// A cloneable, thread-safe posting handle for the action queues.
    #[must_use]
    pub fn poster(&self) -> ActionPoster {
        ActionPoster::new(Arc::clone(&self.actions))
    }

    /// Posts a callback onto the cleanup lane.
    ///
    /// Callable from any thread via [`poster`](Self::poster); this
    /// convenience covers the consuming thread itself.
    pub fn post_cleanup<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_cleanup_with(move |_slicer| action());
    }

    /// Posts a scheduler-aware callback onto the cleanup lane.
    ///
    /// The action runs on the consuming thread with mutable scheduler
    /// access; this is the deferred path for cancelling a task mid-tick.
    /// Actions must not call [`tick`](Self::tick) or
    /// [`finish_all`](Self::finish_all).
    pub fn post_cleanup_with<F>(&self, action: F)
    where
        F: FnOnce(&mut Self) + Send + 'static,
    {
        self.actions.push_cleanup(Box::new(action));
    }

    /// Posts a callback onto the alloc lane.
    pub fn post_alloc<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_alloc_with(move |_slicer| action());
    }

    /// Posts a scheduler-aware callback onto the alloc lane.
    ///
    /// This is how background work (an asset decode finishing on a worker
    /// thread, say) schedules its follow-up task onto the consuming thread.
    pub fn post_alloc_with<F>(&self, action: F)
    where
        F: FnOnce(&mut Self) + Send + 'static,
    {
        self.actions.push_alloc(Box::new(action));
    }

    /// The per-tick budget currently in force.
    #[must_use]
    pub fn budget(&self) -> TickBudget {
        self.budget
    }

    /// Replaces the per-tick budget, effective from the next tick.
    pub fn set_budget(&mut self, budget: TickBudget) {
        debug!(budget = ?budget, "budget replaced");
        self.budget = budget;
    }

    /// This scheduler's activity counters.
    #[must_use]
    pub fn metrics(&self) -> Arc<SlicerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Runs one tick: cleanup drain, slicing pass, alloc drain, each
    /// bounded by the budget. See the [module docs](self) for the full
    /// algorithm. The per-tick timer starts fresh on every call.
    ///
    /// # Panics
    ///
    /// Panics if called reentrantly from a posted action.
    pub fn tick(&mut self) {
        assert!(!self.in_tick, "tick() reentered from a posted action");
        self.metrics.record_tick();
        let ctx = TickContext::new(Instant::now(), self.budget);
        if ctx.should_hold() {
            self.metrics.record_budget_interrupt();
            trace!("tick skipped: no budget at entry");
            return;
        }

        self.in_tick = true;
        self.drain_cleanup(&ctx);
        let exit = self.run_slices(&ctx);
        if exit == SliceExit::Pass && !ctx.should_hold() {
            self.drain_alloc(&ctx);
        }
        self.in_tick = false;
        trace!(
            exit = ?exit,
            queued = self.queue.len(),
            elapsed = ?ctx.elapsed(),
            "tick complete"
        );
    }

    /// Synchronously drains all queued work before teardown.
    ///
    /// Returns immediately if nothing is pending. Otherwise runs every
    /// posted action once (alloc included, unlike a normal tick), then
    /// repeatedly ticks with a growing budget, sleeping a proportionally
    /// growing duration between rounds so background producers can flush,
    /// until no work remains. The original budget is restored afterward.
    ///
    /// This can block the calling thread for hundreds of milliseconds;
    /// acceptable only at shutdown.
    pub fn finish_all(&mut self) {
        if !self.has_pending() {
            trace!("finish_all: nothing pending");
            return;
        }
        info!(
            tasks = self.pending_tasks(),
            actions = self.pending_actions(),
            "finish_all: draining remaining work"
        );

        let actions = Arc::clone(&self.actions);
        while let Some(action) = actions.pop_cleanup() {
            self.run_action(action, "cleanup");
            self.metrics.record_cleanup_action();
        }
        while let Some(action) = actions.pop_alloc() {
            self.run_action(action, "alloc");
            self.metrics.record_alloc_action();
        }

        let saved = self.budget;
        let mut round: u64 = 0;
        while self.has_pending() {
            self.budget = TickBudget::from_millis(round);
            self.tick();
            if self.has_pending() {
                std::thread::sleep(Duration::from_millis(round));
            }
            round += 1;
        }
        self.budget = saved;
        info!(rounds = round, "finish_all: complete");
    }

    fn drain_cleanup(&mut self, ctx: &TickContext) {
        let actions = Arc::clone(&self.actions);
        while let Some(action) = actions.pop_cleanup() {
            self.run_action(action, "cleanup");
            self.metrics.record_cleanup_action();
            if ctx.should_hold() {
                self.metrics.record_budget_interrupt();
                trace!(
                    remaining = actions.cleanup_len(),
                    "cleanup drain interrupted: budget spent"
                );
                break;
            }
        }
    }

    fn drain_alloc(&mut self, ctx: &TickContext) {
        let actions = Arc::clone(&self.actions);
        while let Some(action) = actions.pop_alloc() {
            self.run_action(action, "alloc");
            self.metrics.record_alloc_action();
            if ctx.should_hold() {
                self.metrics.record_budget_interrupt();
                trace!(
                    remaining = actions.alloc_len(),
                    "alloc drain interrupted: budget spent"
                );
                break;
            }
        }
    }

    fn run_slices(&mut self, ctx: &TickContext) -> SliceExit {
        let mut cursor = 0;
        let mut end = self.queue.len();
        while cursor < end {
            if ctx.should_hold() {
                self.metrics.record_budget_interrupt();
                trace!(
                    visited = cursor,
                    remaining = end - cursor,
                    "slicing interrupted: budget spent"
                );
                return SliceExit::Budget;
            }
            loop {
                match self.resume_at(cursor, ctx) {
                    StepResult::Continue => {}
                    StepResult::Hold => return SliceExit::Hold,
                    StepResult::Wait => {
                        cursor += 1;
                        break;
                    }
                    StepResult::Delay => {
                        self.queue.move_to_back(cursor);
                        end -= 1;
                        break;
                    }
                    StepResult::Stall => {
                        self.queue.move_to_front(cursor);
                        return SliceExit::Stall;
                    }
                    StepResult::Cancel => {
                        if let Some(entry) = self.queue.remove_at(cursor) {
                            trace!(id = %entry.id, "task completed");
                            drop(entry);
                        }
                        self.metrics.record_cancelled();
                        end -= 1;
                        break;
                    }
                }
            }
        }
        SliceExit::Pass
    }

    /// Resumes the task at `index` once; a panicking resume is logged and
    /// converted to `Cancel`.
    fn resume_at(&mut self, index: usize, ctx: &TickContext) -> StepResult {
        let Some(entry) = self.queue.get_mut(index) else {
            debug_assert!(false, "resume past queue end");
            return StepResult::Cancel;
        };
        let id = entry.id;
        self.metrics.record_resume();
        match catch_unwind(AssertUnwindSafe(|| entry.task.resume(ctx))) {
            Ok(step) => {
                trace!(id = %id, step = %step, "task resumed");
                let _ = id;
                step
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.metrics.record_task_panic();
                error!(id = %id, panic = %message, "task panicked during resume; cancelling");
                let _ = (id, message);
                StepResult::Cancel
            }
        }
    }

    fn run_action(&mut self, action: Action, lane: &'static str) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| action(&mut *self))) {
            let message = panic_message(payload.as_ref());
            self.metrics.record_action_panic();
            error!(lane = lane, panic = %message, "posted action panicked");
            let _ = (lane, message);
        }
    }
}

impl Default for Slicer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Slicer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slicer")
            .field("queued", &self.queue.len())
            .field("budget", &self.budget)
            .field("actions", &*self.actions)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
