//! Batch driver: walks the source root and runs each model through the
//! pipeline, strictly one after another.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::descriptor::DescriptorReader;
use crate::error::PipelineError;
use crate::models::{
    BatchReport, ModelMetadata, ModelOutcome, ModelReport, ThumbnailStatus, UploadResult,
};
use crate::payload::PayloadBuilder;
use crate::thumbnail::ThumbnailGenerator;
use crate::uploader::Uploader;

/// Stages a model passes through.
///
/// `Uploaded`, `Failed` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// Found in the source root.
    Discovered,
    /// `model.config` parsed and the name checked.
    MetadataValidated,
    /// The highest SDF version resolved to an existing file.
    DescriptorSelected,
    /// The renderer ran (or was skipped); the result does not gate the upload.
    ThumbnailAttempted,
    /// Files enumerated and form fields prepared.
    PayloadBuilt,
    /// Accepted by the server.
    Uploaded,
    /// Upload attempted and rejected.
    Failed,
    /// Rejected before reaching the uploader.
    Skipped,
}

/// Runs every candidate model under a source root through the pipeline.
#[derive(Debug)]
pub struct PipelineDriver {
    source_root: PathBuf,
    thumbnails: ThumbnailGenerator,
    payloads: PayloadBuilder,
    uploader: Uploader,
}

impl PipelineDriver {
    /// Create a driver for models under `source_root`, published as `owner`.
    pub fn new(
        source_root: impl Into<PathBuf>,
        owner: impl Into<String>,
        thumbnails: ThumbnailGenerator,
        uploader: Uploader,
    ) -> Self {
        let source_root = source_root.into();
        Self {
            payloads: PayloadBuilder::new(source_root.clone(), owner),
            source_root,
            thumbnails,
            uploader,
        }
    }

    /// Candidate model directories, sorted by name.
    ///
    /// Entries that are not directories and names starting with `.` are
    /// excluded.
    pub async fn discover_models(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let unreadable = |source| PipelineError::SourceUnreadable {
            path: self.source_root.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.source_root)
            .await
            .map_err(unreadable)?;
        let mut models = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            match tokio::fs::metadata(&path).await {
                Ok(m) if m.is_dir() => models.push(path),
                _ => debug!(path = %path.display(), "Not a model directory"),
            }
        }

        models.sort();
        Ok(models)
    }

    /// Process every candidate model.
    ///
    /// Only a failure to list the source root is returned as an error;
    /// per-model problems end up in the report.
    #[instrument(skip(self), fields(root = %self.source_root.display()))]
    pub async fn run(&self) -> Result<BatchReport, PipelineError> {
        let candidates = self.discover_models().await?;
        info!(count = candidates.len(), "Discovered model directories");

        let mut report = BatchReport::default();
        for model_dir in candidates {
            report.models.push(self.process_model(&model_dir).await);
        }

        info!(
            uploaded = report.uploaded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Run a single model directory through the pipeline.
    pub async fn process_model(&self, model_dir: &Path) -> ModelReport {
        info!(model = %model_dir.display(), "Processing");
        advance(model_dir, ModelState::Discovered);

        let (metadata, sdf) = match Self::validate(model_dir).await {
            Ok(validated) => validated,
            Err(e) => return skipped(model_dir, ThumbnailStatus::NotAttempted, e),
        };
        advance(model_dir, ModelState::DescriptorSelected);

        let thumbnails = self.thumbnails.generate(model_dir, &sdf).await;
        advance(model_dir, ModelState::ThumbnailAttempted);

        let payload = match self.payloads.build(&metadata, model_dir).await {
            Ok(payload) => payload,
            Err(e) => return skipped(model_dir, thumbnails, e),
        };
        advance(model_dir, ModelState::PayloadBuilt);

        let outcome = match self.uploader.upload(&payload).await {
            UploadResult::Success => {
                info!(model = %model_dir.display(), "Uploaded");
                advance(model_dir, ModelState::Uploaded);
                ModelOutcome::Uploaded
            }
            UploadResult::Failure(message) => {
                warn!(
                    model = %model_dir.display(),
                    message = %message,
                    "Failed to upload {}",
                    model_dir.display()
                );
                advance(model_dir, ModelState::Failed);
                ModelOutcome::Failed { message }
            }
        };

        ModelReport {
            model_dir: model_dir.to_path_buf(),
            thumbnails,
            outcome,
        }
    }

    /// Read the descriptor and resolve the SDF file to render and upload.
    async fn validate(model_dir: &Path) -> Result<(ModelMetadata, PathBuf), PipelineError> {
        let metadata = DescriptorReader::read(model_dir).await?;
        advance(model_dir, ModelState::MetadataValidated);

        let sdf = DescriptorReader::resolve_selected(model_dir, &metadata)?;
        Ok((metadata, sdf))
    }
}

fn advance(model_dir: &Path, state: ModelState) {
    debug!(model = %model_dir.display(), ?state, "Model state");
}

fn skipped(model_dir: &Path, thumbnails: ThumbnailStatus, err: PipelineError) -> ModelReport {
    let reason = err.to_string();
    if err.is_model_rejection() {
        warn!(model = %model_dir.display(), reason = %reason, "Skipping model");
    } else {
        error!(model = %model_dir.display(), error = %reason, "Skipping model after I/O failure");
    }
    advance(model_dir, ModelState::Skipped);

    ModelReport {
        model_dir: model_dir.to_path_buf(),
        thumbnails,
        outcome: ModelOutcome::Skipped { reason },
    }
}
