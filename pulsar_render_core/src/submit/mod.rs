/// Submit module - command recording, batching and frame submission

// Module declarations
pub mod command;
pub mod recorder;
pub mod batch_queue;
pub mod coordinator;

// Re-exports
pub use command::*;
pub use recorder::*;
pub use batch_queue::*;
pub use coordinator::*;
