//! Thumbnail orchestration for a single model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gzfuel_core::traits::ThumbnailRenderer;
use tracing::{debug, info, warn};

use crate::models::ThumbnailStatus;
use crate::scene::SceneTemplate;

/// Name of the thumbnail directory inside each model.
pub const THUMBNAIL_DIR: &str = "thumbnails";

/// Drives the renderer for one model at a time.
///
/// Holds the scene template for the lifetime of the run so every model is
/// rendered against the same file.
#[derive(Debug)]
pub struct ThumbnailGenerator {
    renderer: Arc<dyn ThumbnailRenderer>,
    scene: SceneTemplate,
    enabled: bool,
}

impl ThumbnailGenerator {
    /// Create a generator, writing the scene template to a temporary file.
    pub fn new(renderer: Arc<dyn ThumbnailRenderer>) -> std::io::Result<Self> {
        Ok(Self {
            renderer,
            scene: SceneTemplate::create()?,
            enabled: true,
        })
    }

    /// Turn rendering on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Path of the shared scene template.
    pub fn scene_path(&self) -> &Path {
        self.scene.path()
    }

    /// Output directory for `model_dir`.
    pub fn output_dir(model_dir: &Path) -> PathBuf {
        model_dir.join(THUMBNAIL_DIR)
    }

    /// Render thumbnails for `model_dir` from the already validated `sdf` file.
    ///
    /// Never fails: a renderer error is logged and reported as
    /// [`ThumbnailStatus::Failed`].
    pub async fn generate(&self, model_dir: &Path, sdf: &Path) -> ThumbnailStatus {
        if !self.enabled {
            debug!(model = %model_dir.display(), "Thumbnail rendering disabled");
            return ThumbnailStatus::Disabled;
        }

        let output_dir = Self::output_dir(model_dir);
        Self::clear_stale_dir(&output_dir).await;

        match self
            .renderer
            .render(self.scene.path(), sdf, &output_dir)
            .await
        {
            Ok(()) => {
                info!(model = %model_dir.display(), "Created thumbnails");
                ThumbnailStatus::Created
            }
            Err(e) => {
                warn!(
                    model = %model_dir.display(),
                    renderer = self.renderer.name(),
                    error = %e,
                    "Failed to create thumbnails"
                );
                ThumbnailStatus::Failed
            }
        }
    }

    /// Remove a leftover thumbnail directory if it is empty.
    async fn clear_stale_dir(output_dir: &Path) {
        if let Err(e) = tokio::fs::remove_dir(output_dir).await {
            debug!(
                dir = %output_dir.display(),
                error = %e,
                "Thumbnail directory not removed"
            );
        }
    }
}
