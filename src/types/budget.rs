//! Per-tick time budget for the slicing pass.
//!
//! A budget is either a concrete millisecond ceiling or the unlimited
//! sentinel. The ceiling is advisory and cooperative: the scheduler checks
//! it between positions, and well-behaved tasks check it mid-resume through
//! [`TickContext::should_hold`](crate::slicer::TickContext::should_hold),
//! but nothing preempts a task that ignores it.

use core::fmt;
use std::time::Duration;

/// Ceiling on how much wall-clock time one tick may spend on work.
///
/// Two degenerate values bound the range: [`TickBudget::UNLIMITED`]
/// disables time-based interruption entirely (all queued work runs in a
/// single pass), and [`TickBudget::ZERO`] makes every tick a no-op, since
/// the entry check already finds the budget spent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickBudget {
    limit: Option<Duration>,
}

impl TickBudget {
    /// No ceiling: slicing never stops on time.
    pub const UNLIMITED: Self = Self { limit: None };

    /// Zero ceiling: the entry check fails and no work runs.
    pub const ZERO: Self = Self {
        limit: Some(Duration::ZERO),
    };

    /// A budget of `ms` milliseconds per tick.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self {
            limit: Some(Duration::from_millis(ms)),
        }
    }

    /// A budget with an explicit [`Duration`] ceiling.
    #[must_use]
    pub const fn from_duration(limit: Duration) -> Self {
        Self { limit: Some(limit) }
    }

    /// The concrete ceiling, or `None` for the unlimited sentinel.
    #[must_use]
    pub const fn limit(self) -> Option<Duration> {
        self.limit
    }

    /// Returns true for the unlimited sentinel.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.limit.is_none()
    }

    /// Returns true once `elapsed` has consumed the whole budget.
    #[must_use]
    pub fn is_spent(self, elapsed: Duration) -> bool {
        match self.limit {
            None => false,
            Some(limit) => elapsed >= limit,
        }
    }
}

impl Default for TickBudget {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl fmt::Debug for TickBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            None => f.write_str("TickBudget(unlimited)"),
            Some(limit) => write!(f, "TickBudget({limit:?})"),
        }
    }
}
