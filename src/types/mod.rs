//! Core types for the timeslice scheduler.
//!
//! - [`budget`]: per-tick time budget with an unlimited sentinel
//! - [`builder`]: builder error types shared by configuration surfaces
//! - [`id`]: identifier and handle types for scheduled work
//! - [`step`]: the step directive a task returns from each resume

pub mod budget;
pub mod builder;
pub mod id;
pub mod step;

pub use budget::TickBudget;
pub use builder::{BuildError, BuildResult};
pub use id::{SliceHandle, SliceId};
pub use step::StepResult;
