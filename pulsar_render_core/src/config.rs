//! Render core configuration

use crate::error::{Error, Result};

/// Render core configuration
///
/// Recognized options, all fixed at construction time:
/// - `frames_in_flight` trades latency for pacing stalls (1 fully serializes
///   CPU and GPU; 2+ pipelines).
/// - `descriptor_capacity` is the hard upper bound on distinct resource views
///   bound in a single frame. The heap itself holds
///   `descriptor_capacity * frames_in_flight` slots.
/// - `producer_threads` is informational and sizes queue bookkeeping.
#[derive(Debug, Clone)]
pub struct RenderCoreConfig {
    /// Number of frames that may be in flight on the GPU (>= 1)
    pub frames_in_flight: u32,
    /// Descriptor slots available per frame (>= 1)
    pub descriptor_capacity: u32,
    /// Expected number of producer threads recording command batches
    pub producer_threads: u32,
}

impl Default for RenderCoreConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            descriptor_capacity: 1024,
            producer_threads: 4,
        }
    }
}

impl RenderCoreConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if any option is outside its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight == 0 {
            return Err(Error::InitializationFailed(
                "frames_in_flight must be >= 1".to_string(),
            ));
        }
        if self.descriptor_capacity == 0 {
            return Err(Error::InitializationFailed(
                "descriptor_capacity must be >= 1".to_string(),
            ));
        }
        if self
            .descriptor_capacity
            .checked_mul(self.frames_in_flight)
            .is_none()
        {
            return Err(Error::InitializationFailed(
                "descriptor heap size (descriptor_capacity * frames_in_flight) overflows u32"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of slots in the descriptor heap across all ring segments
    ///
    /// `validate` guarantees the product fits in `u32`; call it first.
    pub fn heap_size(&self) -> u32 {
        self.descriptor_capacity * self.frames_in_flight
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
