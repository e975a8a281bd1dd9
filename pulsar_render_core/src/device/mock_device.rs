/// Mock GpuDevice for unit tests (no GPU required)
///
/// Simulates a device timeline that the test advances explicitly.
/// `wait_fence_value` models the GPU catching up: it records the wait and
/// then advances the completed value, so pacing paths stay deterministic.

#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[cfg(test)]
use crate::device::GpuDevice;
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::submit::RenderCommand;

/// One recorded submission
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockSubmission {
    pub fence_value: u64,
    pub commands: Vec<RenderCommand>,
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockGpuDevice {
    completed: AtomicU64,
    submissions: Mutex<Vec<MockSubmission>>,
    waits: Mutex<Vec<u64>>,
    reject_submits: AtomicBool,
    lost: AtomicBool,
}

#[cfg(test)]
impl MockGpuDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulated completed timeline value
    pub fn complete_up_to(&self, value: u64) {
        self.completed.fetch_max(value, Ordering::SeqCst);
    }

    /// Make every subsequent submit fail with a rejection
    pub fn reject_submits(&self, reject: bool) {
        self.reject_submits.store(reject, Ordering::SeqCst);
    }

    /// Simulate device loss
    pub fn lose_device(&self) {
        self.lost.store(true, Ordering::SeqCst);
    }

    /// Restore a lost device (models recreation by the owning engine)
    pub fn restore_device(&self) {
        self.lost.store(false, Ordering::SeqCst);
    }

    /// Every fence value that was blocked on, in call order
    pub fn recorded_waits(&self) -> Vec<u64> {
        self.waits.lock().unwrap().clone()
    }

    /// Every accepted submission, in call order
    pub fn recorded_submissions(&self) -> Vec<MockSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl GpuDevice for MockGpuDevice {
    fn submit(&self, stream: &[RenderCommand], fence_value: u64) -> Result<()> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(Error::DeviceLost);
        }
        if self.reject_submits.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("invalid command encoding".to_string()));
        }
        self.submissions.lock().unwrap().push(MockSubmission {
            fence_value,
            commands: stream.to_vec(),
        });
        Ok(())
    }

    fn completed_fence_value(&self) -> Result<u64> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(Error::DeviceLost);
        }
        Ok(self.completed.load(Ordering::SeqCst))
    }

    fn wait_fence_value(&self, value: u64) -> Result<()> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(Error::DeviceLost);
        }
        self.waits.lock().unwrap().push(value);
        // The GPU catches up: the wait returns once the value is reached
        self.completed.fetch_max(value, Ordering::SeqCst);
        Ok(())
    }
}
