/// GpuDevice trait - the render core's only view of the graphics backend

use crate::error::Result;
use crate::submit::RenderCommand;

/// Graphics device capability set consumed by the render core
///
/// One concrete implementation per target backend. The trait is invoked
/// only at frame boundaries (submission, fence reads, pacing waits); the
/// per-draw hot path (descriptor acquire, command recording) never touches
/// a trait object.
pub trait GpuDevice: Send + Sync {
    /// Execute an ordered command stream and signal `fence_value` on the
    /// device timeline when the stream completes
    ///
    /// # Errors
    ///
    /// - `SubmissionFailed` if the device rejects the stream (e.g. invalid
    ///   command encoding). The stream executes atomically: a rejected
    ///   stream performs no work.
    /// - `DeviceLost` if the device cannot accept work at all.
    fn submit(&self, stream: &[RenderCommand], fence_value: u64) -> Result<()>;

    /// Current completed timeline value (monotonically non-decreasing)
    ///
    /// # Errors
    ///
    /// `DeviceLost` if the timeline cannot be read.
    fn completed_fence_value(&self) -> Result<u64>;

    /// Block until the completed timeline value reaches `value`
    ///
    /// # Errors
    ///
    /// `DeviceLost` if the timeline cannot make progress.
    fn wait_fence_value(&self, value: u64) -> Result<()>;
}
