/// FrameRingAllocator - rotates the descriptor heap through per-frame ring
/// segments, gated on GPU fence completion
///
/// The heap is split into N equal segments, one per frame in flight. A
/// segment is handed out round-robin and only reset after the fence value
/// of its previous occupant generation is confirmed reached on the device.
/// That wait is the engine's single intentional CPU stall tied to GPU
/// pacing: it bounds frames-in-flight and keeps GPU memory from growing
/// without bound.

use crate::error::{Error, Result};
use crate::sync::FrameFenceTracker;

/// Handle to the frame currently being recorded
///
/// Returned by `begin_frame`, consumed by `submit_frame`. Carries the frame
/// generation id so stale handles are rejected instead of silently stamping
/// the wrong segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle {
    /// Monotonically increasing frame generation id
    pub generation: u64,
    /// Ring segment assigned to this generation
    pub segment_index: usize,
}

/// A contiguous sub-range of the descriptor heap owned by one frame in flight
#[derive(Debug, Clone)]
pub struct RingSegment {
    /// Position in the ring
    pub index: usize,
    /// First heap slot of the segment
    pub base: u32,
    /// Number of slots reserved for the segment
    pub capacity: u32,
    /// Timeline value signaled when the segment's last submission completes.
    /// Zero means the segment has never been submitted and is free to use.
    pub fence_value: u64,
    /// Generation currently (or last) occupying the segment
    pub generation: u64,
    /// Most slots the segment's occupants ever used
    pub high_water: u32,
}

/// Round-robin allocator of ring segments
///
/// Owned by the frame lifecycle; `begin_frame`/`end_frame` are called by
/// exactly one thread (the coordinator side), never concurrently.
pub struct FrameRingAllocator {
    segments: Vec<RingSegment>,
    next: usize,
    generation_counter: u64,
    active: Option<usize>,
}

impl FrameRingAllocator {
    /// Create a ring of `frames_in_flight` segments of `segment_capacity`
    /// slots each, covering the heap contiguously from slot 0
    pub fn new(frames_in_flight: u32, segment_capacity: u32) -> Self {
        let segments = (0..frames_in_flight as usize)
            .map(|index| RingSegment {
                index,
                base: index as u32 * segment_capacity,
                capacity: segment_capacity,
                fence_value: 0,
                generation: 0,
                high_water: 0,
            })
            .collect();
        Self {
            segments,
            next: 0,
            generation_counter: 0,
            active: None,
        }
    }

    /// Select the next segment for a new frame generation
    ///
    /// Blocks on `fence.wait_until` if the segment's previous occupant has
    /// not completed on the GPU. Never waits for a segment that was never
    /// stamped.
    ///
    /// # Errors
    ///
    /// - `DeviceLost` if the fence wait cannot make progress.
    /// - `InvalidState` if a frame is already active.
    pub fn begin_frame(&mut self, fence: &FrameFenceTracker) -> Result<FrameHandle> {
        if let Some(index) = self.active {
            return Err(Error::InvalidState(format!(
                "begin_frame while generation {} is still recording",
                self.segments[index].generation
            )));
        }

        let index = self.next;
        let pending = self.segments[index].fence_value;
        if pending != 0 && !fence.is_reached(pending)? {
            crate::render_trace!(
                "pulsar::RingAllocator",
                "Pacing stall: waiting for fence {} before reusing segment {}",
                pending,
                index
            );
            fence.wait_until(pending)?;
        }

        self.generation_counter += 1;
        let generation = self.generation_counter;

        let segment = &mut self.segments[index];
        segment.generation = generation;
        self.active = Some(index);
        self.next = (index + 1) % self.segments.len();

        Ok(FrameHandle { generation, segment_index: index })
    }

    /// Stamp the active segment with the fence value that marks it
    /// reclaimable, and record how many slots the frame used
    pub fn end_frame(&mut self, fence_value: u64, used: u32) -> Result<()> {
        let index = self.active.take().ok_or_else(|| {
            Error::InvalidState("end_frame called with no active frame".to_string())
        })?;
        let segment = &mut self.segments[index];
        segment.fence_value = fence_value;
        segment.high_water = segment.high_water.max(used);
        Ok(())
    }

    /// Segment currently assigned to the recording frame
    pub fn active_segment(&self) -> Option<&RingSegment> {
        self.active.map(|index| &self.segments[index])
    }

    /// All ring segments, in heap order
    pub fn segments(&self) -> &[RingSegment] {
        &self.segments
    }

    /// Latest generation id handed out
    pub fn current_generation(&self) -> u64 {
        self.generation_counter
    }

    /// Re-arm every segment as immediately reclaimable
    ///
    /// Used after device loss, once the owning engine has recreated the
    /// device: no stamped fence will ever signal on the dead timeline.
    pub fn rearm(&mut self) {
        self.active = None;
        for segment in &mut self.segments {
            segment.fence_value = 0;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "ring_allocator_tests.rs"]
mod tests;
