/// BatchRecorder - a producer thread's private command buffer
///
/// Each worker records into its own recorder; nothing is shared until
/// `finish` seals the commands into an immutable `CommandBatch` ready to be
/// pushed to the batch queue. Dropping a recorder before pushing cancels
/// the batch at zero cost - nothing was ever submitted.

use glam::Mat4;

use crate::descriptor::SlotIndex;
use crate::submit::command::{CommandBatch, IndexType, RenderCommand};
use crate::submit::coordinator::ProducerKey;

pub struct BatchRecorder {
    producer: ProducerKey,
    commands: Vec<RenderCommand>,
    slots_used: Vec<SlotIndex>,
}

impl BatchRecorder {
    /// Start recording for `producer`
    pub fn new(producer: ProducerKey) -> Self {
        Self {
            producer,
            commands: Vec::new(),
            slots_used: Vec::new(),
        }
    }

    /// Bind a pipeline
    pub fn bind_pipeline(&mut self, pipeline: u64) {
        self.commands.push(RenderCommand::BindPipeline { pipeline });
    }

    /// Bind a descriptor table slot
    ///
    /// The slot is also recorded as a batch dependency so the submission
    /// side knows which heap entries the batch reads.
    pub fn bind_descriptor_table(&mut self, slot: SlotIndex) {
        if !self.slots_used.contains(&slot) {
            self.slots_used.push(slot);
        }
        self.commands.push(RenderCommand::BindDescriptorTable { slot });
    }

    /// Bind a vertex buffer at `offset` bytes
    pub fn bind_vertex_buffer(&mut self, buffer: u64, offset: u64) {
        self.commands.push(RenderCommand::BindVertexBuffer { buffer, offset });
    }

    /// Bind an index buffer
    pub fn bind_index_buffer(&mut self, buffer: u64, offset: u64, index_type: IndexType) {
        self.commands.push(RenderCommand::BindIndexBuffer { buffer, offset, index_type });
    }

    /// Push a raw constant payload
    pub fn push_constants(&mut self, offset: u32, data: &[u8]) {
        self.commands.push(RenderCommand::PushConstants {
            offset,
            data: data.to_vec(),
        });
    }

    /// Push an object transform as a push-constant payload
    pub fn push_transform(&mut self, offset: u32, transform: &Mat4) {
        self.push_constants(offset, bytemuck::bytes_of(transform));
    }

    /// Draw vertices
    pub fn draw(&mut self, vertex_count: u32, first_vertex: u32) {
        self.commands.push(RenderCommand::Draw { vertex_count, first_vertex });
    }

    /// Draw indexed vertices
    pub fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) {
        self.commands.push(RenderCommand::DrawIndexed {
            index_count,
            first_index,
            vertex_offset,
        });
    }

    /// Dispatch a compute grid
    pub fn dispatch(&mut self, groups_x: u32, groups_y: u32, groups_z: u32) {
        self.commands.push(RenderCommand::Dispatch { groups_x, groups_y, groups_z });
    }

    /// Number of commands recorded so far
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Seal the recording into an immutable batch
    pub fn finish(self) -> CommandBatch {
        CommandBatch::new(self.producer, self.commands, self.slots_used)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
