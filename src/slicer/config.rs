//! Scheduler configuration types.
//!
//! In most cases you should use
//! [`SlicerBuilder`](super::builder::SlicerBuilder) rather than creating a
//! [`SlicerConfig`] directly.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `budget` | 4 ms per tick |
//! | `work_capacity` | 16 |

use crate::types::TickBudget;

/// Default per-tick budget in milliseconds.
pub const DEFAULT_BUDGET_MS: u64 = 4;

/// Default work queue capacity hint.
pub const DEFAULT_WORK_CAPACITY: usize = 16;

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicerConfig {
    /// Per-tick time ceiling for drains and the slicing pass.
    pub budget: TickBudget,
    /// Initial capacity hint for the work queue.
    pub work_capacity: usize,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            budget: TickBudget::from_millis(DEFAULT_BUDGET_MS),
            work_capacity: DEFAULT_WORK_CAPACITY,
        }
    }
}
