//! Error types for the Pulsar render core
//!
//! This module defines the error taxonomy shared by the descriptor layer,
//! the fence tracker and the submission pipeline.

use std::fmt;

/// Result type for render core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// The active ring segment has no descriptor slots left.
    ///
    /// Recoverable: the caller drops the remaining draws for this frame.
    /// The heap itself is untouched.
    CapacityExceeded { capacity: u32, generation: u64 },

    /// The device rejected a submitted command stream.
    ///
    /// Recoverable at frame granularity; the failing generation's ring
    /// segment is still stamped for reclamation.
    SubmissionFailed { generation: u64, reason: String },

    /// The device timeline cannot make progress.
    ///
    /// Fatal to this core. The owning engine must recreate the device and
    /// reset the context; nothing is retried internally.
    DeviceLost,

    /// Initialization failed (invalid configuration, construction errors)
    InitializationFailed(String),

    /// An operation was called outside its valid frame lifecycle state
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded { capacity, generation } => write!(
                f,
                "Descriptor capacity exceeded: {} slots exhausted in generation {}",
                capacity, generation
            ),
            Error::SubmissionFailed { generation, reason } => {
                write!(f, "Submission failed for generation {}: {}", generation, reason)
            }
            Error::DeviceLost => write!(f, "Device lost"),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR and return an `InvalidState` error in one step
///
/// # Example
///
/// ```ignore
/// render_bail!("pulsar::SlotTable", "acquire called outside an active frame");
/// ```
#[macro_export]
macro_rules! render_bail {
    ($source:expr, $($arg:tt)*) => {{
        $crate::render_error!($source, $($arg)*);
        return Err($crate::pulsar::Error::InvalidState(format!($($arg)*)));
    }};
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
