/// Descriptor module - shader-visible descriptor heap and frame ring allocation

// Module declarations
pub mod slot;
pub mod slot_table;
pub mod ring_allocator;

// Re-exports
pub use slot::*;
pub use slot_table::*;
pub use ring_allocator::*;
