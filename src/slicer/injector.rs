//! Cross-thread action queues.
//!
//! Two unbounded multi-producer FIFO lanes of deferred callbacks, drained
//! by the consuming thread each tick: the cleanup lane runs before slicing,
//! the alloc lane only after slicing and only if budget remains, because
//! alloc work is assumed to create more work than cleanup work retires.
//!
//! These queues are the only path by which other threads may reach the
//! scheduler. [`ActionPoster`] is the cloneable producer handle. Actions
//! run on the consuming thread with mutable access to the scheduler, so a
//! background thread can hand off follow-up work (schedule a task, cancel
//! a handle) without any synchronization of its own.

use crate::slicer::Slicer;
use core::fmt;
use crossbeam_queue::SegQueue;
use std::sync::Arc;

/// A deferred callback, run on the consuming thread with scheduler access.
pub(crate) type Action = Box<dyn FnOnce(&mut Slicer) + Send + 'static>;

/// The two action lanes, shared between the scheduler and its posters.
#[derive(Default)]
pub(crate) struct ActionQueues {
    cleanup: SegQueue<Action>,
    alloc: SegQueue<Action>,
}

impl ActionQueues {
    pub(crate) fn push_cleanup(&self, action: Action) {
        self.cleanup.push(action);
    }

    pub(crate) fn push_alloc(&self, action: Action) {
        self.alloc.push(action);
    }

    pub(crate) fn pop_cleanup(&self) -> Option<Action> {
        self.cleanup.pop()
    }

    pub(crate) fn pop_alloc(&self) -> Option<Action> {
        self.alloc.pop()
    }

    pub(crate) fn cleanup_len(&self) -> usize {
        self.cleanup.len()
    }

    pub(crate) fn alloc_len(&self) -> usize {
        self.alloc.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cleanup.is_empty() && self.alloc.is_empty()
    }
}

impl fmt::Debug for ActionQueues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueues")
            .field("cleanup", &self.cleanup.len())
            .field("alloc", &self.alloc.len())
            .finish()
    }
}

/// Thread-safe posting handle for the scheduler's action queues.
///
/// Cloneable and `Send + Sync`; any number of producer threads may post
/// concurrently with each other and with an in-progress tick. Within one
/// lane, actions from a single producer run in the order they were posted;
/// there is no ordering between concurrent producers.
///
/// Actions run on the consuming thread during a later
/// [`Slicer::tick`](crate::slicer::Slicer::tick) (or during
/// [`Slicer::finish_all`](crate::slicer::Slicer::finish_all)). The `_with`
/// variants hand the action mutable scheduler access, which is how
/// background work schedules follow-up tasks or performs a deferred
/// cancel. Actions must not call `tick` or `finish_all` themselves.
#[derive(Clone)]
pub struct ActionPoster {
    queues: Arc<ActionQueues>,
}

impl ActionPoster {
    pub(crate) fn new(queues: Arc<ActionQueues>) -> Self {
        Self { queues }
    }

    /// Posts a callback onto the cleanup lane, drained first each tick.
    pub fn post_cleanup<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_cleanup_with(move |_slicer| action());
    }

    /// Posts a scheduler-aware callback onto the cleanup lane.
    pub fn post_cleanup_with<F>(&self, action: F)
    where
        F: FnOnce(&mut Slicer) + Send + 'static,
    {
        self.queues.push_cleanup(Box::new(action));
    }

    /// Posts a callback onto the alloc lane, drained after slicing and only
    /// while budget remains.
    pub fn post_alloc<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_alloc_with(move |_slicer| action());
    }

    /// Posts a scheduler-aware callback onto the alloc lane.
    pub fn post_alloc_with<F>(&self, action: F)
    where
        F: FnOnce(&mut Slicer) + Send + 'static,
    {
        self.queues.push_alloc(Box::new(action));
    }
}

impl fmt::Debug for ActionPoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPoster")
            .field("queues", &*self.queues)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn lanes_are_fifo_and_independent() {
        init_test("lanes_are_fifo_and_independent");
        let mut slicer = Slicer::new();
        let queues = ActionQueues::default();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for tag in ["c1", "c2"] {
            let order = Arc::clone(&order);
            queues.push_cleanup(Box::new(move |_: &mut Slicer| {
                order.lock().expect("lock").push(tag);
            }));
        }
        for tag in ["a1", "a2"] {
            let order = Arc::clone(&order);
            queues.push_alloc(Box::new(move |_: &mut Slicer| {
                order.lock().expect("lock").push(tag);
            }));
        }

        while let Some(action) = queues.pop_cleanup() {
            action(&mut slicer);
        }
        while let Some(action) = queues.pop_alloc() {
            action(&mut slicer);
        }

        let observed = order.lock().expect("lock").clone();
        crate::assert_with_log!(
            observed == vec!["c1", "c2", "a1", "a2"],
            "lane order",
            vec!["c1", "c2", "a1", "a2"],
            observed
        );
        crate::test_complete!("lanes_are_fifo_and_independent");
    }

    #[test]
    fn poster_is_send_across_threads() {
        init_test("poster_is_send_across_threads");
        let mut slicer = Slicer::new();
        let queues = Arc::new(ActionQueues::default());
        let poster = ActionPoster::new(Arc::clone(&queues));
        let ran = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let poster = poster.clone();
                let ran = Arc::clone(&ran);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let ran = Arc::clone(&ran);
                        poster.post_cleanup(move || {
                            ran.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("producer thread");
        }

        crate::assert_with_log!(
            queues.cleanup_len() == 100,
            "all posts enqueued",
            100,
            queues.cleanup_len()
        );
        while let Some(action) = queues.pop_cleanup() {
            action(&mut slicer);
        }
        let total = ran.load(Ordering::SeqCst);
        crate::assert_with_log!(total == 100, "each action ran exactly once", 100, total);
        crate::assert_with_log!(queues.is_empty(), "queues drained", true, queues.is_empty());
        crate::test_complete!("poster_is_send_across_threads");
    }
}
