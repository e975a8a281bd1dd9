/// RenderCommandBatchQueue - multi-producer, single-consumer handoff of
/// recorded command batches
///
/// Producers push finished batches from any thread without blocking; the
/// submission coordinator drains everything once per frame boundary. The
/// queue guarantees per-producer FIFO order and that every batch pushed
/// before a drain is included in that drain. It deliberately does NOT own
/// the "all producers have pushed for frame N" handshake - that counting
/// barrier belongs to the surrounding frame scheduler.

use crate::error::{Error, Result};
use crate::submit::command::CommandBatch;

pub struct RenderCommandBatchQueue {
    tx: flume::Sender<CommandBatch>,
    rx: flume::Receiver<CommandBatch>,
    /// Informational sizing hint from the configuration
    producer_hint: u32,
}

impl RenderCommandBatchQueue {
    /// Create a queue expecting roughly `producer_hint` producer threads
    pub fn new(producer_hint: u32) -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx, producer_hint }
    }

    /// Push a finished batch
    ///
    /// Non-blocking and safe from any number of concurrent producers.
    /// Batches from the same producer are drained in push order.
    pub fn push(&self, batch: CommandBatch) -> Result<()> {
        self.tx
            .send(batch)
            .map_err(|_| Error::InvalidState("batch queue is closed".to_string()))
    }

    /// Drain every batch pushed so far, leaving the queue empty
    ///
    /// Non-blocking: returns whatever has been pushed and does not wait for
    /// producers that have not pushed yet. Called by exactly one consumer
    /// thread at the frame boundary.
    pub fn drain_all(&self) -> Vec<CommandBatch> {
        self.rx.try_iter().collect()
    }

    /// Number of batches currently queued
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no batches are queued
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Expected producer thread count (informational)
    pub fn producer_hint(&self) -> u32 {
        self.producer_hint
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "batch_queue_tests.rs"]
mod tests;
