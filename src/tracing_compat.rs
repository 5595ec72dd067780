//! Tracing compatibility layer for structured logging.
//!
//! Provides a unified interface for tracing that works whether or not the
//! `tracing-integration` feature is enabled:
//!
//! - **With the feature (default)**: re-exports from the `tracing` crate.
//! - **Without**: no-op macros that compile to nothing for zero runtime
//!   overhead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use timeslice::tracing_compat::{debug, info, trace};
//!
//! info!("starting tick");
//! debug!(id = %handle, "task scheduled");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn};

// When tracing is disabled, provide no-op macros
#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! No-op implementations when tracing is disabled.

    /// No-op trace-level logging macro.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug-level logging macro.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info-level logging macro.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn-level logging macro.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op error-level logging macro.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    // Re-export the macros at module level
    pub use crate::{debug, error, info, trace, warn};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;
