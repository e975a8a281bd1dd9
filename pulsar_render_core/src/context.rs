/// RenderContext - explicit top-level context for the render core
///
/// Owns the descriptor heap, the frame ring, the fence tracker, the batch
/// queue and the submission coordinator. The frame loop constructs one
/// context and passes it by reference into producer and coordinator
/// operations; there is no global engine instance.
///
/// Frame lifecycle, driven by the frame scheduler:
/// 1. `begin_frame` - paces against the GPU, scopes the descriptor table
/// 2. producers: `acquire_descriptor`, `record_batch` .. `push_batch`
/// 3. `submit_frame` - drains, concatenates, submits, stamps the segment
/// 4. `shutdown` - drains all in-flight generations, releases resources

use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::RenderCoreConfig;
use crate::descriptor::{
    DescriptorSlotTable, DescriptorStats, FrameHandle, FrameRingAllocator, SlotIndex,
    ViewIdentity,
};
use crate::device::GpuDevice;
use crate::error::{Error, Result};
use crate::submit::{
    BatchRecorder, CommandBatch, FrameReport, ProducerKey, RenderCommandBatchQueue,
    SubmissionCoordinator,
};
use crate::sync::FrameFenceTracker;

/// Aggregate counters for the render core
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderCoreStats {
    /// Descriptor allocation counters
    pub descriptors: DescriptorStats,
    /// Frames successfully submitted
    pub frames_submitted: u64,
    /// Batches drained into submitted frames
    pub batches_submitted: u64,
    /// Commands drained into submitted frames
    pub commands_submitted: u64,
}

pub struct RenderContext {
    config: RenderCoreConfig,
    table: DescriptorSlotTable,
    fence: FrameFenceTracker,
    queue: RenderCommandBatchQueue,
    ring: Mutex<FrameRingAllocator>,
    coordinator: Mutex<SubmissionCoordinator>,
    /// Latched on the first DeviceLost; short-circuits begin_frame until
    /// reset_after_device_loss
    device_lost: AtomicBool,
    shut_down: AtomicBool,
    frames_submitted: AtomicU64,
    batches_submitted: AtomicU64,
    commands_submitted: AtomicU64,
}

impl RenderContext {
    /// Build a render core against `device` with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the configuration is invalid.
    pub fn new(device: Arc<dyn GpuDevice>, config: RenderCoreConfig) -> Result<Self> {
        config.validate()?;

        crate::render_info!(
            "pulsar::Context",
            "Render core initialized: {} frames in flight, {} descriptor slots per frame, {} producer threads expected",
            config.frames_in_flight,
            config.descriptor_capacity,
            config.producer_threads
        );

        Ok(Self {
            table: DescriptorSlotTable::new(config.heap_size()),
            fence: FrameFenceTracker::new(Arc::clone(&device)),
            queue: RenderCommandBatchQueue::new(config.producer_threads),
            ring: Mutex::new(FrameRingAllocator::new(
                config.frames_in_flight,
                config.descriptor_capacity,
            )),
            coordinator: Mutex::new(SubmissionCoordinator::new(device)),
            device_lost: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            frames_submitted: AtomicU64::new(0),
            batches_submitted: AtomicU64::new(0),
            commands_submitted: AtomicU64::new(0),
            config,
        })
    }

    /// Register a batch producer; registration order is the cross-producer
    /// tie-break when frames are concatenated
    pub fn register_producer(&self, name: &str) -> ProducerKey {
        self.lock_coordinator().register_producer(name)
    }

    /// Begin a new frame
    ///
    /// May block on GPU fence completion when the ring segment about to be
    /// reused is still in flight - the engine's pacing mechanism.
    ///
    /// # Errors
    ///
    /// - `DeviceLost` immediately if a prior fatal device error is latched.
    /// - `InvalidState` after shutdown or if a frame is already active.
    pub fn begin_frame(&self) -> Result<FrameHandle> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("render core is shut down".to_string()));
        }
        if self.device_lost.load(Ordering::SeqCst) {
            return Err(Error::DeviceLost);
        }

        let handle = {
            let mut ring = self.lock_ring();
            ring.begin_frame(&self.fence).map_err(|err| self.latch_if_lost(err))?
        };

        let base = handle.segment_index as u32 * self.config.descriptor_capacity;
        self.table
            .activate(base, self.config.descriptor_capacity, handle.generation)?;

        Ok(handle)
    }

    /// Acquire a descriptor slot for `identity` within the current frame
    ///
    /// Called per draw/dispatch from any producer thread. Cache hits return
    /// the slot already assigned this frame. A `CapacityExceeded` result
    /// means the producer should skip the draw; the error is reported
    /// synchronously so it can decide.
    pub fn acquire_descriptor(&self, identity: ViewIdentity) -> Result<SlotIndex> {
        self.table.acquire(identity)
    }

    /// Start recording a private command buffer for `producer`
    ///
    /// Dropping the recorder before `push_batch` cancels it at no cost.
    pub fn record_batch(&self, producer: ProducerKey) -> BatchRecorder {
        BatchRecorder::new(producer)
    }

    /// Push a finished batch for the current frame (non-blocking, any thread)
    pub fn push_batch(&self, batch: CommandBatch) -> Result<()> {
        self.queue.push(batch)
    }

    /// Drain the queue, submit the frame's command stream, stamp the ring
    /// segment
    ///
    /// The frame scheduler calls this once per frame, after its producer
    /// handshake guarantees all batches for the frame were pushed.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `handle` is not the active frame.
    /// - `SubmissionFailed` if the device rejects the stream; the segment
    ///   is still stamped so it is eventually reclaimed.
    /// - `DeviceLost`, fatal and latched.
    pub fn submit_frame(&self, handle: FrameHandle) -> Result<FrameReport> {
        let active = self.lock_ring().active_segment().map(|segment| segment.generation);
        match active {
            Some(generation) if generation == handle.generation => {}
            Some(generation) => {
                crate::render_bail!(
                    "pulsar::Context",
                    "submit_frame for generation {} but generation {} is active",
                    handle.generation,
                    generation
                );
            }
            None => {
                crate::render_bail!(
                    "pulsar::Context",
                    "submit_frame called with no active frame"
                );
            }
        }

        let used = self.table.release(handle.generation)?;

        let mut coordinator = self.lock_coordinator();
        let result = coordinator.submit_frame(&self.queue, &self.fence, handle);

        // Stamp the segment even when the submission failed: a rejected
        // stream performed no work, so the last accepted fence is the
        // correct reclamation point and the segment cannot leak.
        let stamp = match &result {
            Ok(report) => report.fence_value,
            Err(_) => coordinator.last_accepted_fence(),
        };
        drop(coordinator);
        self.lock_ring().end_frame(stamp, used)?;

        match result {
            Ok(report) => {
                self.frames_submitted.fetch_add(1, Ordering::Relaxed);
                self.batches_submitted
                    .fetch_add(report.batches as u64, Ordering::Relaxed);
                self.commands_submitted
                    .fetch_add(report.commands as u64, Ordering::Relaxed);
                Ok(report)
            }
            Err(err) => Err(self.latch_if_lost(err)),
        }
    }

    /// Drain all in-flight generations and close the context
    ///
    /// Blocks until the last issued fence is reached, then discards any
    /// batches that missed their frame (logged, never silent). Subsequent
    /// `begin_frame` calls fail with `InvalidState`.
    pub fn shutdown(&self) -> Result<()> {
        if self.lock_ring().active_segment().is_some() {
            return Err(Error::InvalidState(
                "shutdown called while a frame is recording".to_string(),
            ));
        }
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let leftovers = self.queue.drain_all();
        if !leftovers.is_empty() {
            crate::render_warn!(
                "pulsar::Context",
                "Discarding {} batch(es) pushed after their frame was submitted",
                leftovers.len()
            );
        }

        if !self.device_lost.load(Ordering::SeqCst) {
            let last = self.fence.last_issued();
            if last > 0 {
                self.fence
                    .wait_until(last)
                    .map_err(|err| self.latch_if_lost(err))?;
            }
        }

        crate::render_info!("pulsar::Context", "Render core shut down");
        Ok(())
    }

    /// Clear the device-loss latch after the owning engine recreated the
    /// device
    ///
    /// Discards queued batches and re-arms every ring segment as
    /// immediately reclaimable; no fence stamped on the dead timeline will
    /// ever signal. Device recreation itself is outside this core.
    pub fn reset_after_device_loss(&self) {
        let discarded = self.queue.drain_all().len();
        if discarded > 0 {
            crate::render_warn!(
                "pulsar::Context",
                "Discarding {} batch(es) recorded before device loss",
                discarded
            );
        }

        let mut ring = self.lock_ring();
        if let Some(segment) = ring.active_segment() {
            // A frame was mid-recording when the device died; drop its scope
            let _ = self.table.release(segment.generation);
        }
        ring.rearm();
        drop(ring);

        self.device_lost.store(false, Ordering::SeqCst);
        crate::render_info!("pulsar::Context", "Device-loss latch cleared");
    }

    /// Snapshot of the core's counters
    pub fn stats(&self) -> RenderCoreStats {
        RenderCoreStats {
            descriptors: self.table.stats(),
            frames_submitted: self.frames_submitted.load(Ordering::Relaxed),
            batches_submitted: self.batches_submitted.load(Ordering::Relaxed),
            commands_submitted: self.commands_submitted.load(Ordering::Relaxed),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RenderCoreConfig {
        &self.config
    }

    fn latch_if_lost(&self, err: Error) -> Error {
        if matches!(err, Error::DeviceLost) {
            self.device_lost.store(true, Ordering::SeqCst);
        }
        err
    }

    fn lock_ring(&self) -> std::sync::MutexGuard<'_, FrameRingAllocator> {
        self.ring.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_coordinator(&self) -> std::sync::MutexGuard<'_, SubmissionCoordinator> {
        self.coordinator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
