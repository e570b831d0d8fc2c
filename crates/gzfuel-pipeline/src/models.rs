//! Domain types flowing through the model pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Multipart value of the `multipart` field.
pub const MULTIPART_FLAG: &str = "true";
/// Fuel license id applied to every upload.
pub const DEFAULT_LICENSE: &str = "1";
/// Fuel permission flag applied to every upload.
pub const DEFAULT_PERMISSION: &str = "0";
/// Fuel privacy flag applied to every upload.
pub const DEFAULT_PRIVATE: &str = "0";

/// One `<sdf version="...">path</sdf>` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorEntry {
    /// Declared SDF version; `0.0` when the attribute does not parse.
    pub version: f64,
    /// Path relative to the model directory.
    pub path: String,
}

/// Validated contents of a model's `model.config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Trimmed, non-empty model name.
    pub name: String,
    /// Trimmed description; empty when the descriptor has none.
    pub description: String,
    /// Every SDF declaration, in document order.
    pub entries: Vec<DescriptorEntry>,
    /// Entry with the greatest version, if any were declared.
    pub selected: Option<DescriptorEntry>,
}

impl ModelMetadata {
    /// Name used in the model URL: spaces become underscores.
    pub fn url_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}

/// A file attached to the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Location on disk.
    pub path: PathBuf,
    /// Name sent as the part's filename, relative to the source root.
    pub upload_name: String,
    /// File size in bytes.
    pub size: u64,
}

/// Everything needed to build the multipart body for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Model name.
    pub name: String,
    /// URL-safe model name.
    pub url_name: String,
    /// Model description.
    pub description: String,
    /// Comma separated tags (always empty).
    pub tags: String,
    /// License id.
    pub license: String,
    /// Owning account.
    pub owner: String,
    /// Permission flag.
    pub permission: String,
    /// Privacy flag.
    pub private: String,
    /// Model files.
    pub files: Vec<FilePart>,
}

impl UploadPayload {
    /// Text fields in the order they are written to the form.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("multipart", MULTIPART_FLAG.to_string()),
            ("name", self.name.clone()),
            ("URLName", self.url_name.clone()),
            ("description", self.description.clone()),
            ("tags", self.tags.clone()),
            ("license", self.license.clone()),
            ("owner", self.owner.clone()),
            ("permission", self.permission.clone()),
            ("private", self.private.clone()),
        ]
    }

    /// Combined size of all file parts.
    pub fn total_file_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Outcome of a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadResult {
    /// The server answered `200`.
    Success,
    /// Any other status or a transport error, with the server's `msg` if any.
    Failure(String),
}

impl UploadResult {
    /// Whether the upload succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// What happened to the thumbnail step of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStatus {
    /// The model was rejected before the renderer could run.
    NotAttempted,
    /// Rendering is switched off in the configuration.
    Disabled,
    /// The renderer reported success.
    Created,
    /// The renderer failed; the upload still went ahead.
    Failed,
}

impl fmt::Display for ThumbnailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAttempted => write!(f, "-"),
            Self::Disabled => write!(f, "disabled"),
            Self::Created => write!(f, "created"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal state of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    /// Accepted by the server.
    Uploaded,
    /// Rejected by the server or lost in transit.
    Failed {
        /// Message extracted from the server response, possibly empty.
        message: String,
    },
    /// Never reached the uploader.
    Skipped {
        /// Why the model was rejected.
        reason: String,
    },
}

/// Per-model record produced by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Model directory.
    pub model_dir: PathBuf,
    /// Thumbnail step result.
    pub thumbnails: ThumbnailStatus,
    /// Final outcome.
    pub outcome: ModelOutcome,
}

/// All model reports of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Reports in processing order.
    pub models: Vec<ModelReport>,
}

impl BatchReport {
    /// Number of models accepted by the server.
    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Uploaded))
    }

    /// Number of models whose upload failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Failed { .. }))
    }

    /// Number of models rejected before upload.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ModelOutcome::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&ModelOutcome) -> bool) -> usize {
        self.models.iter().filter(|r| pred(&r.outcome)).count()
    }
}
