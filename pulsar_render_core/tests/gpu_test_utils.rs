#![allow(dead_code)]
//! GPU test utilities - Shared fake device for integration tests
//!
//! Integration tests exercise the render core through its public API only,
//! so they bring their own `GpuDevice` implementation instead of a real
//! backend. `TestGpuDevice` simulates a timeline the test advances
//! explicitly and records every submission and fence wait for assertions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use pulsar_render_core::pulsar::{Error, GpuDevice, RenderCoreConfig, RenderContext, Result};
use pulsar_render_core::RenderCommand;

/// One submission accepted by the fake device
#[derive(Debug, Clone)]
pub struct TestSubmission {
    pub fence_value: u64,
    pub commands: Vec<RenderCommand>,
}

/// Fake GPU device with an explicitly driven timeline
#[derive(Debug, Default)]
pub struct TestGpuDevice {
    completed: AtomicU64,
    submissions: Mutex<Vec<TestSubmission>>,
    waits: Mutex<Vec<u64>>,
    reject_submits: AtomicBool,
    lost: AtomicBool,
}

impl TestGpuDevice {
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
    pub fn recorded_submissions(&self) -> Vec<TestSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

impl GpuDevice for TestGpuDevice {
    fn submit(&self, stream: &[RenderCommand], fence_value: u64) -> Result<()> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(Error::DeviceLost);
        }
        if self.reject_submits.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("invalid command encoding".to_string()));
        }
        self.submissions.lock().unwrap().push(TestSubmission {
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

/// Build a render context over a fresh `TestGpuDevice`
pub fn create_test_context(
    frames_in_flight: u32,
    descriptor_capacity: u32,
    producer_threads: u32,
) -> (Arc<TestGpuDevice>, RenderContext) {
    let device = Arc::new(TestGpuDevice::new());
    let context = RenderContext::new(
        Arc::clone(&device) as Arc<dyn GpuDevice>,
        RenderCoreConfig {
            frames_in_flight,
            descriptor_capacity,
            producer_threads,
        },
    )
    .expect("test context creation should succeed");
    (device, context)
}
