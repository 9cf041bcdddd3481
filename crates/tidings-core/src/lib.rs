//! # tidings-core
//!
//! Core crate for Tidings. Contains the unified error system,
//! configuration schemas, typed notification identifiers, the lifecycle
//! event vocabulary and the delivery trait implemented by event consumers.
//!
//! This crate has **no** internal dependencies on other Tidings crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
