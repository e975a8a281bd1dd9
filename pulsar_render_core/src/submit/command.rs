/// Render commands and immutable command batches

use crate::descriptor::SlotIndex;
use crate::submit::coordinator::ProducerKey;

/// Type of indices in a bound index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

/// A single recorded GPU command
///
/// Commands reference resources by opaque handle and descriptor slots by
/// heap index; ownership stays with the resource layer and the slot table.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Bind a graphics or compute pipeline
    BindPipeline { pipeline: u64 },
    /// Bind a descriptor table slot for the following draws/dispatches
    BindDescriptorTable { slot: SlotIndex },
    /// Bind a vertex buffer
    BindVertexBuffer { buffer: u64, offset: u64 },
    /// Bind an index buffer
    BindIndexBuffer { buffer: u64, offset: u64, index_type: IndexType },
    /// Push a small constant payload visible to the bound pipeline
    PushConstants { offset: u32, data: Vec<u8> },
    /// Draw vertices
    Draw { vertex_count: u32, first_vertex: u32 },
    /// Draw indexed vertices
    DrawIndexed { index_count: u32, first_index: u32, vertex_offset: i32 },
    /// Dispatch a compute grid
    Dispatch { groups_x: u32, groups_y: u32, groups_z: u32 },
}

/// An immutable, ordered sequence of recorded commands plus the descriptor
/// slots it depends on
///
/// Created by a producer thread when it finishes recording; owned by the
/// batch queue until consumed; never mutated after creation. Structural
/// immutability is what makes the cross-thread handoff safe without
/// per-command locking.
#[derive(Debug, Clone)]
pub struct CommandBatch {
    producer: ProducerKey,
    commands: Vec<RenderCommand>,
    slots_used: Vec<SlotIndex>,
}

impl CommandBatch {
    /// Seal recorded commands into an immutable batch
    pub fn new(
        producer: ProducerKey,
        commands: Vec<RenderCommand>,
        slots_used: Vec<SlotIndex>,
    ) -> Self {
        Self { producer, commands, slots_used }
    }

    /// Producer that recorded the batch
    pub fn producer(&self) -> ProducerKey {
        self.producer
    }

    /// Recorded commands, in recording order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Descriptor slots the batch references (by identity, not ownership)
    pub fn slots_used(&self) -> &[SlotIndex] {
        &self.slots_used
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the batch records no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Consume the batch, yielding its command sequence
    pub(crate) fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
