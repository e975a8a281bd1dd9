/// Descriptor slot types - handles and identities for shader-visible bindings

/// Index of a slot in the shader-visible descriptor heap
///
/// Stable for the lifetime of the frame generation that allocated it.
/// A slot index carries no meaning across generations: the same numeric
/// index may name a different view two frames apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// Raw heap index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

/// Opaque handle to a GPU resource owned by the surrounding resource layer
///
/// The render core never dereferences the handle; it only uses it as part
/// of a view identity and passes it through recorded commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ResourceHandle(pub u64);

/// Kind of resource view a descriptor slot binds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Read-only texture sampled in a shader
    SampledTexture,
    /// Read/write storage texture
    StorageTexture,
    /// Uniform (constant) buffer
    UniformBuffer,
    /// Read/write storage buffer
    StorageBuffer,
    /// Sampler state object
    Sampler,
}

/// Identity of a bound resource view: resource handle + view kind
///
/// This is the descriptor cache key. Two draws binding the same resource
/// through the same view kind within one frame share a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewIdentity {
    pub resource: ResourceHandle,
    pub kind: ViewKind,
}

impl ViewIdentity {
    pub const fn new(resource: ResourceHandle, kind: ViewKind) -> Self {
        Self { resource, kind }
    }
}

/// A single entry of the descriptor heap
///
/// Invariant: `generation` always equals the generation of the ring segment
/// that currently owns the slot. A slot is never rebound while its
/// generation is still referenced by an unfinished GPU submission; the
/// ring allocator's fence gate enforces this before any segment reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorSlot {
    /// View currently bound to this slot, if any
    pub bound: Option<ViewIdentity>,
    /// Frame generation that owns the binding
    pub generation: u64,
}
