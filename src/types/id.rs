//! Identifier and handle types for scheduled work.
//!
//! Ids are drawn from a per-scheduler monotonic counter and never reused,
//! so a stale handle can never alias a later task.

use core::fmt;

/// A unique identifier for one scheduled slice of work.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceId(u64);

impl SliceId {
    /// Creates a slice ID from a raw counter value (internal use).
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Creates a slice ID for testing purposes.
    #[doc(hidden)]
    #[must_use]
    pub const fn new_for_test(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SliceId({})", self.0)
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// An opaque capability referencing a queued task.
///
/// A handle is valid exactly while its task is present in the work queue;
/// explicit cancellation, a
/// [`StepResult::Cancel`](crate::types::StepResult::Cancel) yield, or a
/// panicking resume all invalidate it. The handle carries no ownership:
/// dropping it does nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceHandle {
    id: SliceId,
}

impl SliceHandle {
    pub(crate) const fn new(id: SliceId) -> Self {
        Self { id }
    }

    /// The identifier this handle refers to.
    #[must_use]
    pub const fn id(self) -> SliceId {
        self.id
    }
}

impl fmt::Debug for SliceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SliceHandle({})", self.id)
    }
}

impl fmt::Display for SliceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}
