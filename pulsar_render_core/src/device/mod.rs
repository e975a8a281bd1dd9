/// Device module - the single graphics backend seam

pub mod device;
#[cfg(test)]
pub mod mock_device;

pub use device::*;
#[cfg(test)]
pub use mock_device::*;
