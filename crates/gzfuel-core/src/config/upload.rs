//! Upload transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the HTTP upload step.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadConfig {
    /// Pause after every upload attempt, in seconds.
    #[serde(default = "default_delay_seconds")]
    #[validate(range(max = 600))]
    pub delay_seconds: u64,
    /// Whole-request timeout for one upload, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    #[validate(range(min = 1, max = 86400))]
    pub request_timeout_seconds: u64,
}

impl UploadConfig {
    /// Pause applied after each attempt.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

fn default_delay_seconds() -> u64 {
    2
}

fn default_request_timeout_seconds() -> u64 {
    300
}
