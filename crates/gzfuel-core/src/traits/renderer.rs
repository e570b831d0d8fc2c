//! Thumbnail rendering capability.

use std::path::Path;

use async_trait::async_trait;

use crate::result::AppResult;

/// Renders preview images of a model description into a directory.
///
/// The production implementation launches an external simulator process;
/// tests supply in-process fakes.
#[async_trait]
pub trait ThumbnailRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Render `model` inside the `scene` template, writing images to `output_dir`.
    ///
    /// Returns `Ok(())` only when the renderer reported success.
    async fn render(&self, scene: &Path, model: &Path, output_dir: &Path) -> AppResult<()>;
}
