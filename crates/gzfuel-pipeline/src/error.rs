//! Error type for the model pipeline.
//!
//! Descriptor and layout problems are per-model rejections: the driver
//! turns them into a skipped outcome. The remaining variants are fatal for
//! the run and map into `gzfuel_core::error::AppError`.

use std::path::PathBuf;

use gzfuel_core::error::AppError;
use thiserror::Error;

/// Unified error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    // --- Descriptor errors ---
    /// The descriptor could not be read from disk.
    #[error("Failed to open {path}")]
    DescriptorUnreadable {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not well-formed XML.
    #[error("Failed to parse {path}: {source}")]
    DescriptorMalformed {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: roxmltree::Error,
    },

    /// The document root is not a `<model>` element.
    #[error("Error reading <model> element in {path}")]
    MissingModelElement {
        /// Descriptor path.
        path: PathBuf,
    },

    /// `<name>` is absent or blank.
    #[error("Missing or empty <name> element in {path}")]
    MissingName {
        /// Descriptor path.
        path: PathBuf,
    },

    /// The selected SDF file does not exist.
    #[error("{relative} file does not exist")]
    DescriptorFileMissing {
        /// Path as declared in the descriptor (empty when nothing was declared).
        relative: String,
        /// Resolved path that was checked.
        path: PathBuf,
    },

    // --- Fatal errors ---
    /// The source root could not be listed.
    #[error("Cannot read source directory {path}: {source}")]
    SourceUnreadable {
        /// Source root.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file under a model directory is outside the source root.
    #[error("{path} is not below the source root")]
    OutsideRoot {
        /// Offending path.
        path: PathBuf,
    },

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether this error only disqualifies the current model.
    pub fn is_model_rejection(&self) -> bool {
        matches!(
            self,
            Self::DescriptorUnreadable { .. }
                | Self::DescriptorMalformed { .. }
                | Self::MissingModelElement { .. }
                | Self::MissingName { .. }
                | Self::DescriptorFileMissing { .. }
        )
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::SourceUnreadable { .. } => AppError::not_found(err.to_string()),
            PipelineError::Http(_) => AppError::configuration(err.to_string()),
            PipelineError::Io(_) | PipelineError::OutsideRoot { .. } => {
                AppError::storage(err.to_string())
            }
            _ => AppError::validation(err.to_string()),
        }
    }
}
