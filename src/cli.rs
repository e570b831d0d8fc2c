//! Command-line surface and run wiring.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use gzfuel_core::config::UploaderConfig;
use gzfuel_core::error::AppError;
use gzfuel_pipeline::{
    BatchReport, GazeboRenderer, ModelOutcome, ModelReport, PipelineDriver, ThumbnailGenerator,
    Uploader,
};

use crate::output::{self, OutputFormat};

/// Environment variable holding the Fuel JWT.
pub const TOKEN_ENV: &str = "IGN_FUEL_JWT";

/// Upload a directory of Gazebo models to a Fuel server
#[derive(Debug, Parser)]
#[command(name = "gzmodel-upload", version, about, long_about = None)]
pub struct Cli {
    /// Destination URL, such as https://api.ignitionfuel.org
    #[arg(short, long)]
    pub url: String,

    /// Directory containing one or more Gazebo model directories
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Name of the owner
    #[arg(short, long)]
    pub owner: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Summary output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl Cli {
    /// Check preconditions, then run the whole batch.
    pub async fn execute(&self, config: UploaderConfig) -> Result<(), AppError> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::authentication(format!(
                    "{TOKEN_ENV} environment variable is not set. \
                     Set {TOKEN_ENV} to a valid JWT authentication token."
                ))
            })?;

        if !self.dir.is_dir() {
            return Err(AppError::not_found(format!(
                "Source directory not found: {}",
                self.dir.display()
            )));
        }

        let renderer = Arc::new(GazeboRenderer::new(&config.renderer));
        let thumbnails =
            ThumbnailGenerator::new(renderer)?.with_enabled(config.renderer.enabled);
        let uploader = Uploader::new(&self.url, token, &config.upload)?;
        info!(
            endpoint = uploader.endpoint(),
            delay = ?uploader.delay(),
            owner = %self.owner,
            "Uploading models"
        );
        let driver = PipelineDriver::new(&self.dir, &self.owner, thumbnails, uploader);

        let report = driver.run().await?;
        print_report(&report, self.format);
        Ok(())
    }
}

/// One summary row per model.
#[derive(Debug, Serialize, Tabled)]
pub struct ModelRow {
    /// Model directory.
    #[tabled(rename = "Model")]
    pub model: String,
    /// Thumbnail step result.
    #[tabled(rename = "Thumbnails")]
    pub thumbnails: String,
    /// Final outcome.
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    /// Skip reason or server message.
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl From<&ModelReport> for ModelRow {
    fn from(report: &ModelReport) -> Self {
        let (outcome, detail) = match &report.outcome {
            ModelOutcome::Uploaded => ("uploaded", String::new()),
            ModelOutcome::Failed { message } => ("failed", message.clone()),
            ModelOutcome::Skipped { reason } => ("skipped", reason.clone()),
        };
        Self {
            model: report.model_dir.display().to_string(),
            thumbnails: report.thumbnails.to_string(),
            outcome: outcome.to_string(),
            detail,
        }
    }
}

fn print_report(report: &BatchReport, format: OutputFormat) {
    let rows: Vec<ModelRow> = report.models.iter().map(ModelRow::from).collect();
    output::print_list(&rows, format);

    let summary = format!(
        "{} uploaded, {} failed, {} skipped",
        report.uploaded(),
        report.failed(),
        report.skipped()
    );
    if report.failed() == 0 && report.skipped() == 0 {
        output::print_success(&summary);
    } else {
        output::print_warning(&summary);
    }
}
