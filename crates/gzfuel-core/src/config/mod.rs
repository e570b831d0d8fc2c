//! Uploader configuration schemas.
//!
//! The configuration is deserialized via the `config` crate from an optional
//! TOML file overlaid with `GZFUEL__`-prefixed environment variables. Every
//! field carries a default, so an empty source yields a usable config.

pub mod logging;
pub mod renderer;
pub mod upload;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::logging::LoggingConfig;
use self::renderer::RendererConfig;
use self::upload::UploadConfig;

use crate::error::AppError;

/// Prefix for configuration overrides taken from the environment.
pub const ENV_PREFIX: &str = "GZFUEL";

/// Root uploader configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UploaderConfig {
    /// Upload transport settings.
    #[serde(default)]
    #[validate(nested)]
    pub upload: UploadConfig,
    /// Thumbnail renderer settings.
    #[serde(default)]
    #[validate(nested)]
    pub renderer: RendererConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UploaderConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; a missing file falls back to defaults.
    /// Variables such as `GZFUEL__UPLOAD__DELAY_SECONDS` override file values.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("renderer.args")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }
}
