//! Ordered work queue of suspended tasks.
//!
//! Touched only by the consuming thread; insertion order is execution
//! order and the tie-break when the budget runs out mid-pass.

use crate::slicer::task::SliceTask;
use crate::types::SliceId;
use core::fmt;
use std::collections::VecDeque;

/// One queued task with its identifier.
pub(crate) struct Entry {
    pub(crate) id: SliceId,
    pub(crate) task: Box<dyn SliceTask>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("id", &self.id).finish_non_exhaustive()
    }
}

/// The ordered sequence of queued tasks.
#[derive(Debug, Default)]
pub(crate) struct WorkQueue {
    entries: VecDeque<Entry>,
}

impl WorkQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push_back(&mut self, entry: Entry) {
        self.entries.push_back(entry);
    }

    pub(crate) fn contains(&self, id: SliceId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Removes the entry with the given id, wherever it sits.
    pub(crate) fn remove(&mut self, id: SliceId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.entries.remove(index)
    }

    /// Removes the entry at `index`.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Entry> {
        self.entries.remove(index)
    }

    /// Moves the entry at `index` to the back of the queue.
    pub(crate) fn move_to_back(&mut self, index: usize) {
        debug_assert!(index < self.entries.len());
        if let Some(entry) = self.entries.remove(index) {
            self.entries.push_back(entry);
        }
    }

    /// Moves the entry at `index` to the front, shifting earlier entries
    /// back by one.
    pub(crate) fn move_to_front(&mut self, index: usize) {
        debug_assert!(index < self.entries.len());
        if let Some(entry) = self.entries.remove(index) {
            self.entries.push_front(entry);
        }
    }

    /// Queue contents front-to-back, for diagnostics and tests.
    pub(crate) fn ids(&self) -> Vec<SliceId> {
        self.entries.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::task::TickContext;
    use crate::types::StepResult;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    fn sid(raw: u64) -> SliceId {
        SliceId::new_for_test(raw)
    }

    fn entry(raw: u64) -> Entry {
        Entry {
            id: sid(raw),
            task: Box::new(|_cx: &TickContext| StepResult::Wait),
        }
    }

    fn ids(queue: &WorkQueue) -> Vec<SliceId> {
        queue.ids()
    }

    #[test]
    fn push_preserves_insertion_order() {
        init_test("push_preserves_insertion_order");
        let mut queue = WorkQueue::with_capacity(4);
        for raw in 1..=3 {
            queue.push_back(entry(raw));
        }
        let order = ids(&queue);
        crate::assert_with_log!(order == vec![sid(1), sid(2), sid(3)], "order", vec![sid(1), sid(2), sid(3)], order);
        crate::test_complete!("push_preserves_insertion_order");
    }

    #[test]
    fn remove_by_id_targets_the_right_entry() {
        init_test("remove_by_id_targets_the_right_entry");
        let mut queue = WorkQueue::with_capacity(4);
        for raw in 1..=3 {
            queue.push_back(entry(raw));
        }
        let removed = queue.remove(sid(2));
        crate::assert_with_log!(removed.is_some(), "entry removed", true, removed.is_some());
        let missing = queue.remove(sid(2));
        crate::assert_with_log!(missing.is_none(), "second remove misses", true, missing.is_none());
        let order = ids(&queue);
        crate::assert_with_log!(order == vec![sid(1), sid(3)], "order after remove", vec![sid(1), sid(3)], order);
        crate::test_complete!("remove_by_id_targets_the_right_entry");
    }

    #[test]
    fn move_to_back_and_front_reorder() {
        init_test("move_to_back_and_front_reorder");
        let mut queue = WorkQueue::with_capacity(4);
        for raw in 1..=3 {
            queue.push_back(entry(raw));
        }
        queue.move_to_back(0);
        let order = ids(&queue);
        crate::assert_with_log!(order == vec![sid(2), sid(3), sid(1)], "after move_to_back", vec![sid(2), sid(3), sid(1)], order);
        queue.move_to_front(2);
        let order = ids(&queue);
        crate::assert_with_log!(order == vec![sid(1), sid(2), sid(3)], "after move_to_front", vec![sid(1), sid(2), sid(3)], order);
        crate::test_complete!("move_to_back_and_front_reorder");
    }

    #[test]
    fn contains_tracks_membership() {
        init_test("contains_tracks_membership");
        let mut queue = WorkQueue::with_capacity(2);
        queue.push_back(entry(7));
        let present = queue.contains(sid(7));
        crate::assert_with_log!(present, "present before remove", true, present);
        queue.remove(sid(7));
        let present = queue.contains(sid(7));
        crate::assert_with_log!(!present, "absent after remove", false, present);
        crate::test_complete!("contains_tracks_membership");
    }
}
