//! Multipart payload assembly.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::{
    DEFAULT_LICENSE, DEFAULT_PERMISSION, DEFAULT_PRIVATE, FilePart, ModelMetadata, UploadPayload,
};

/// Builds [`UploadPayload`]s for models below a source root.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    source_root: PathBuf,
    owner: String,
}

impl PayloadBuilder {
    /// Create a builder for models under `source_root`, published as `owner`.
    pub fn new(source_root: impl Into<PathBuf>, owner: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            owner: owner.into(),
        }
    }

    /// Assemble the payload for `model_dir`.
    pub async fn build(
        &self,
        metadata: &ModelMetadata,
        model_dir: &Path,
    ) -> Result<UploadPayload, PipelineError> {
        let files = self.collect_files(model_dir).await?;

        debug!(
            model = %model_dir.display(),
            files = files.len(),
            "Payload assembled"
        );

        Ok(UploadPayload {
            name: metadata.name.clone(),
            url_name: metadata.url_name(),
            description: metadata.description.clone(),
            tags: String::new(),
            license: DEFAULT_LICENSE.to_string(),
            owner: self.owner.clone(),
            permission: DEFAULT_PERMISSION.to_string(),
            private: DEFAULT_PRIVATE.to_string(),
            files,
        })
    }

    /// Every non-directory entry below `model_dir`, sorted by upload name.
    ///
    /// Directories whose name starts with `.` are not descended into;
    /// dot-files themselves are kept. Symlinked directories are not followed.
    pub async fn collect_files(&self, model_dir: &Path) -> Result<Vec<FilePart>, PipelineError> {
        let mut files = Vec::new();
        let mut dirs_to_visit = vec![model_dir.to_path_buf()];

        while let Some(current_dir) = dirs_to_visit.pop() {
            let mut entries = match tokio::fs::read_dir(&current_dir).await {
                Ok(e) => e,
                Err(e) => {
                    warn!(
                        dir = %current_dir.display(),
                        error = %e,
                        "Failed to read directory, skipping"
                    );
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    if !is_hidden(&path) {
                        dirs_to_visit.push(path);
                    }
                    continue;
                }

                let metadata = if file_type.is_symlink() {
                    match tokio::fs::metadata(&path).await {
                        Ok(m) if m.is_file() => m,
                        _ => continue,
                    }
                } else {
                    entry.metadata().await?
                };

                files.push(FilePart {
                    upload_name: self.upload_name(&path)?,
                    size: metadata.len(),
                    path,
                });
            }
        }

        files.sort_by(|a, b| a.upload_name.cmp(&b.upload_name));
        Ok(files)
    }

    /// Path of `path` relative to the source root, `/`-separated.
    pub fn upload_name(&self, path: &Path) -> Result<String, PipelineError> {
        let relative = path
            .strip_prefix(&self.source_root)
            .map_err(|_| PipelineError::OutsideRoot {
                path: path.to_path_buf(),
            })?;

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        Ok(segments.join("/"))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
