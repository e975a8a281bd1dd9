/*!
# Pulsar Render Core

GPU-facing resource layer for the Pulsar rendering engine: shader-visible
descriptor allocation, frame pacing against the device timeline, and
multi-producer command batching with single-stream submission.

## Architecture

- **DescriptorSlotTable**: bounded descriptor heap with a per-frame
  view-identity cache (duplicate binds share a slot)
- **FrameRingAllocator**: rotates the heap through per-frame ring segments,
  reset only after GPU fence confirmation
- **FrameFenceTracker**: issues timeline targets and answers reclamation
  queries against the device's completed value
- **RenderCommandBatchQueue**: multi-producer, single-consumer handoff of
  immutable command batches
- **SubmissionCoordinator**: drains the queue once per frame and submits one
  ordered stream to the device

The surrounding engine (scene graph, asset loading, window bootstrap) sits
on top of two narrow contracts: "reserve a descriptor table slot for this
resource view" and "submit this recorded command batch for the current
frame". The graphics backend sits below, behind the `GpuDevice` trait.
*/

// Internal modules
mod config;
mod context;
mod error;
pub mod log;
pub mod descriptor;
pub mod device;
pub mod submit;
pub mod sync;

// Main pulsar namespace module
pub mod pulsar {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration and top-level context
    pub use crate::config::RenderCoreConfig;
    pub use crate::context::{RenderContext, RenderCoreStats};

    // Graphics backend seam
    pub use crate::device::GpuDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Descriptor sub-module
    pub mod descriptor {
        pub use crate::descriptor::*;
    }

    // Submission sub-module
    pub mod submit {
        pub use crate::submit::*;
    }

    // Sync sub-module
    pub mod sync {
        pub use crate::sync::*;
    }
}

// Flat re-exports for the common path
pub use crate::config::RenderCoreConfig;
pub use crate::context::{RenderContext, RenderCoreStats};
pub use crate::descriptor::{
    DescriptorSlot, DescriptorSlotTable, DescriptorStats, FrameHandle, FrameRingAllocator,
    ResourceHandle, RingSegment, SlotIndex, ViewIdentity, ViewKind,
};
pub use crate::device::GpuDevice;
pub use crate::error::{Error, Result};
pub use crate::submit::{
    BatchRecorder, CommandBatch, FrameGeneration, FrameReport, IndexType, ProducerKey,
    RenderCommand, RenderCommandBatchQueue, SubmissionCoordinator,
};
pub use crate::sync::FrameFenceTracker;

// Re-export math library at crate root
pub use glam;
