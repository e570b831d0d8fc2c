//! Thumbnail renderer configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Placeholder replaced with the scene template path.
pub const SCENE_PLACEHOLDER: &str = "{scene}";
/// Placeholder replaced with the thumbnail output directory.
pub const OUTPUT_DIR_PLACEHOLDER: &str = "{output_dir}";
/// Placeholder replaced with the selected model description file.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Settings for the external thumbnail renderer.
///
/// `args` is a template: each argument may contain the `{scene}`,
/// `{output_dir}` and `{model}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RendererConfig {
    /// Whether thumbnails are rendered at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Renderer executable.
    #[serde(default = "default_command")]
    #[validate(length(min = 1))]
    pub command: String,
    /// Argument template.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Timeout for one renderer invocation, in seconds.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 7200))]
    pub timeout_seconds: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_command(),
            args: default_args(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_command() -> String {
    "gzserver".to_string()
}

fn default_args() -> Vec<String> {
    [
        "-s",
        "libModelPropShop.so",
        SCENE_PLACEHOLDER,
        "--propshop-save",
        OUTPUT_DIR_PLACEHOLDER,
        "--propshop-model",
        MODEL_PLACEHOLDER,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_timeout_seconds() -> u64 {
    300
}
