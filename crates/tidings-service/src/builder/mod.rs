//! Notification descriptors and the callback bindings they carry.

pub mod notification;
pub mod registry;

pub use notification::NotificationBuilder;
pub use registry::CallbackRegistry;
