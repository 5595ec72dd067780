//! Timeslice: cooperative, frame-budgeted work slicing for frame-driven
//! hosts.
//!
//! # Overview
//!
//! Timeslice amortizes expensive, interruptible jobs across the frames of a
//! host loop. A single consumer thread drives [`Slicer::tick`] once per
//! frame; each tick spends at most a configured millisecond budget resuming
//! suspendable tasks and running callbacks posted from other threads. There
//! is no preemption: budgets are advisory, tasks yield cooperatively, and a
//! tick is bounded by one pass over the tasks present when it started.
//!
//! # Core Guarantees
//!
//! - **Single-threaded execution**: tasks only ever run on the consumer
//!   thread; the queue needs no synchronization
//! - **Cross-thread posting**: any thread hands work to the consumer through
//!   lock-free action queues, cleanup lane before alloc lane
//! - **Bounded ticks**: one pass per tick, budget-checked between positions
//! - **Panic containment**: a panicking task is logged and removed, never
//!   unwound through the host's frame loop
//! - **Synchronous shutdown**: [`Slicer::finish_all`] drains every queue
//!   before teardown
//!
//! # Module Structure
//!
//! - [`types`]: budgets, identifiers, step directives, builder errors
//! - [`slicer`]: the scheduler, its queues, configuration, and metrics
//! - [`tracing_compat`]: structured logging shim (feature-gated no-ops)
//! - [`test_utils`]: logging and assertion helpers for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]

pub mod slicer;
pub mod test_utils;
pub mod tracing_compat;
pub mod types;

pub use slicer::{
    ActionPoster, MetricsSnapshot, SliceTask, Slicer, SlicerBuilder, SlicerConfig, SlicerMetrics,
    TickContext,
};
pub use types::{BuildError, BuildResult, SliceHandle, SliceId, StepResult, TickBudget};
