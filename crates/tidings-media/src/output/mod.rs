//! Built-in volume and output implementations for hosts without a device.

pub mod logging;
pub mod volume;

pub use logging::LoggingOutput;
pub use volume::SharedVolume;
