/// SubmissionCoordinator - the single consumer of the batch queue
///
/// Once per frame boundary it drains all pushed batches, concatenates them
/// into one ordered command stream (each batch's internal order preserved,
/// ties broken by producer registration order), submits the stream to the
/// device, and associates the frame generation with its fence target.

use std::sync::Arc;
use slotmap::{new_key_type, SlotMap};

use crate::device::GpuDevice;
use crate::descriptor::FrameHandle;
use crate::error::{Error, Result};
use crate::submit::batch_queue::RenderCommandBatchQueue;
use crate::submit::command::RenderCommand;
use crate::sync::FrameFenceTracker;

new_key_type! {
    /// Stable key for a registered batch producer
    pub struct ProducerKey;
}

struct ProducerRecord {
    name: String,
    /// Registration order, the cross-producer tie-break at concatenation
    order: u32,
}

/// A submitted frame generation and the fence target that retires it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeneration {
    /// Monotonically increasing generation id
    pub id: u64,
    /// Ring segment owned by this generation
    pub segment_index: usize,
    /// Timeline value whose completion retires the generation;
    /// `None` if the submission was rejected (nothing will signal)
    pub fence_target: Option<u64>,
}

/// Summary of one submitted frame
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub generation: u64,
    pub fence_value: u64,
    pub batches: usize,
    pub commands: usize,
}

pub struct SubmissionCoordinator {
    device: Arc<dyn GpuDevice>,
    producers: SlotMap<ProducerKey, ProducerRecord>,
    registration_counter: u32,
    /// Fence value of the most recent accepted submission. Rejected frames
    /// stamp their segment with this instead of a target that will never
    /// signal.
    last_accepted_fence: u64,
    last_generation: Option<FrameGeneration>,
}

impl SubmissionCoordinator {
    pub fn new(device: Arc<dyn GpuDevice>) -> Self {
        Self {
            device,
            producers: SlotMap::with_key(),
            registration_counter: 0,
            last_accepted_fence: 0,
            last_generation: None,
        }
    }

    /// Register a batch producer
    ///
    /// Registration order determines where a producer's batches land when
    /// batches from different producers are concatenated for one frame.
    pub fn register_producer(&mut self, name: &str) -> ProducerKey {
        let order = self.registration_counter;
        self.registration_counter += 1;
        let key = self.producers.insert(ProducerRecord {
            name: name.to_string(),
            order,
        });
        crate::render_debug!(
            "pulsar::Coordinator",
            "Registered producer '{}' (order {})",
            name,
            order
        );
        key
    }

    /// Name a producer was registered under
    pub fn producer_name(&self, key: ProducerKey) -> Option<&str> {
        self.producers.get(key).map(|record| record.name.as_str())
    }

    fn producer_order(&self, key: ProducerKey) -> u32 {
        // Unregistered producers sort last but are never dropped
        self.producers.get(key).map_or(u32::MAX, |record| record.order)
    }

    /// Drain, concatenate and submit the frame's command stream
    ///
    /// # Errors
    ///
    /// - `SubmissionFailed` with the offending generation id if the device
    ///   rejects the stream. The caller must still stamp the frame's ring
    ///   segment (see `last_accepted_fence`) so it is eventually reclaimed.
    /// - `DeviceLost`, fatal, propagated unchanged.
    pub fn submit_frame(
        &mut self,
        queue: &RenderCommandBatchQueue,
        fence: &FrameFenceTracker,
        frame: FrameHandle,
    ) -> Result<FrameReport> {
        let mut batches = queue.drain_all();
        // Stable sort: producers keep their registration order, each
        // producer keeps its push order, batch-internal order is untouched.
        batches.sort_by_key(|batch| self.producer_order(batch.producer()));

        let batch_count = batches.len();
        let mut stream: Vec<RenderCommand> =
            Vec::with_capacity(batches.iter().map(|b| b.len()).sum());
        for batch in batches {
            stream.extend(batch.into_commands());
        }

        let fence_value = fence.signal();
        self.last_generation = Some(FrameGeneration {
            id: frame.generation,
            segment_index: frame.segment_index,
            fence_target: None,
        });

        match self.device.submit(&stream, fence_value) {
            Ok(()) => {
                self.last_accepted_fence = fence_value;
                if let Some(generation) = self.last_generation.as_mut() {
                    generation.fence_target = Some(fence_value);
                }
                crate::render_trace!(
                    "pulsar::Coordinator",
                    "Submitted generation {}: {} batches, {} commands, fence {}",
                    frame.generation,
                    batch_count,
                    stream.len(),
                    fence_value
                );
                Ok(FrameReport {
                    generation: frame.generation,
                    fence_value,
                    batches: batch_count,
                    commands: stream.len(),
                })
            }
            Err(Error::DeviceLost) => {
                crate::render_error!(
                    "pulsar::Coordinator",
                    "Device lost while submitting generation {}",
                    frame.generation
                );
                Err(Error::DeviceLost)
            }
            Err(err) => {
                crate::render_error!(
                    "pulsar::Coordinator",
                    "Device rejected generation {}: {}",
                    frame.generation,
                    err
                );
                Err(Error::SubmissionFailed {
                    generation: frame.generation,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Fence value of the most recent accepted submission
    ///
    /// The stamp to use for a rejected frame's segment: it is reached as
    /// soon as all previously accepted work completes.
    pub fn last_accepted_fence(&self) -> u64 {
        self.last_accepted_fence
    }

    /// The most recently submitted frame generation
    pub fn last_generation(&self) -> Option<FrameGeneration> {
        self.last_generation
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
