//! External thumbnail renderer.
//!
//! Runs the configured simulator command as a child process with a
//! timeout. Arguments come from a template in [`RendererConfig`].

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use gzfuel_core::config::renderer::{
    MODEL_PLACEHOLDER, OUTPUT_DIR_PLACEHOLDER, RendererConfig, SCENE_PLACEHOLDER,
};
use gzfuel_core::error::{AppError, ErrorKind};
use gzfuel_core::result::AppResult;
use gzfuel_core::traits::ThumbnailRenderer;
use tokio::process::Command;
use tracing::{debug, info};

/// Renders thumbnails by launching `gzserver` with the PropShop plugin.
#[derive(Debug, Clone)]
pub struct GazeboRenderer {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl GazeboRenderer {
    /// Build a renderer from configuration.
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// Substitute template placeholders in the argument list.
    pub fn substitute_args(&self, scene: &Path, model: &Path, output_dir: &Path) -> Vec<String> {
        let scene = scene.to_string_lossy();
        let model = model.to_string_lossy();
        let output_dir = output_dir.to_string_lossy();

        self.args
            .iter()
            .map(|arg| {
                arg.replace(SCENE_PLACEHOLDER, &scene)
                    .replace(OUTPUT_DIR_PLACEHOLDER, &output_dir)
                    .replace(MODEL_PLACEHOLDER, &model)
            })
            .collect()
    }
}

#[async_trait]
impl ThumbnailRenderer for GazeboRenderer {
    fn name(&self) -> &str {
        &self.command
    }

    async fn render(&self, scene: &Path, model: &Path, output_dir: &Path) -> AppResult<()> {
        let start = Instant::now();
        let args = self.substitute_args(scene, model, output_dir);

        debug!(command = %self.command, ?args, "Launching renderer");

        tokio::fs::create_dir_all(output_dir).await?;

        let mut cmd = Command::new(&self.command);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to launch '{}'", self.command),
                    e,
                ));
            }
            Err(_) => {
                return Err(AppError::external_service(format!(
                    "'{}' timed out after {}s",
                    self.command,
                    self.timeout.as_secs()
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(
                command = %self.command,
                stdout = %stdout.chars().take(2000).collect::<String>(),
                "Renderer output"
            );
        }

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(AppError::external_service(format!(
                "'{}' exited with {}",
                self.command, code
            )));
        }

        info!(
            command = %self.command,
            duration_ms = start.elapsed().as_millis() as u64,
            "Renderer finished"
        );
        Ok(())
    }
}
