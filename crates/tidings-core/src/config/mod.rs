//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so an empty or missing
//! file yields a usable configuration.

pub mod audio;
pub mod bridge;
pub mod builder;
pub mod logging;
pub mod push;

use serde::{Deserialize, Serialize};

pub use self::audio::AudioConfig;
pub use self::bridge::BridgeConfig;
pub use self::builder::BuilderConfig;
pub use self::logging::LoggingConfig;
pub use self::push::PushConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Event bridge settings.
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Audio playback settings.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Notification builder settings.
    #[serde(default)]
    pub builder: BuilderConfig,
    /// Push message settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, an environment-specific overlay and
    /// environment variables prefixed with `TIDINGS__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from a custom directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TIDINGS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
