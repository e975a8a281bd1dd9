/// Sync module - GPU timeline tracking

pub mod fence_tracker;

pub use fence_tracker::*;
