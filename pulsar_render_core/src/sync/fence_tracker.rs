/// FrameFenceTracker - issues GPU timeline targets and answers "is it safe
/// to reclaim yet?"
///
/// The device advances a monotonically non-decreasing completed value as it
/// finishes submitted work. The tracker hands out strictly increasing target
/// values for upcoming submissions and compares or waits against the
/// device's completed value. It never fails under normal operation; a
/// stalled or lost device surfaces as `DeviceLost` and is fatal to the frame
/// pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::device::GpuDevice;
use crate::error::Result;

pub struct FrameFenceTracker {
    device: Arc<dyn GpuDevice>,
    next_target: AtomicU64,
}

impl FrameFenceTracker {
    pub fn new(device: Arc<dyn GpuDevice>) -> Self {
        Self {
            device,
            next_target: AtomicU64::new(0),
        }
    }

    /// Next strictly increasing timeline value to target for the upcoming
    /// submission. First call returns 1; zero is reserved for "never
    /// submitted".
    pub fn signal(&self) -> u64 {
        self.next_target.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Highest target handed out so far (shutdown drains to this)
    pub fn last_issued(&self) -> u64 {
        self.next_target.load(Ordering::SeqCst)
    }

    /// Non-blocking: has the device's completed timeline value reached
    /// `fence_value`?
    pub fn is_reached(&self, fence_value: u64) -> Result<bool> {
        Ok(self.device.completed_fence_value()? >= fence_value)
    }

    /// Block the calling thread until `fence_value` is reached
    ///
    /// Used only by the ring allocator's pacing check and by shutdown.
    pub fn wait_until(&self, fence_value: u64) -> Result<()> {
        if self.is_reached(fence_value)? {
            return Ok(());
        }
        self.device.wait_fence_value(fence_value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "fence_tracker_tests.rs"]
mod tests;
