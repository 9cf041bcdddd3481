//! Notification lifecycle service.

pub mod service;

pub use service::NotificationService;
