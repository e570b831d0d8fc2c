//! # Fuel model pipeline
//!
//! Processes a directory of Gazebo models one at a time: each model's
//! `model.config` is validated, the highest SDF version is selected, a
//! preview thumbnail is rendered by an external process, the model files are
//! packaged as a multipart form, and the form is posted to a Fuel server.
//!
//! A failure in one model is reported and the batch moves on; only fatal
//! preconditions surface as errors from [`PipelineDriver::run`].

pub mod descriptor;
pub mod error;
pub mod models;
pub mod payload;
pub mod processor;
pub mod renderer;
pub mod scene;
pub mod thumbnail;
pub mod uploader;

pub use descriptor::DescriptorReader;
pub use error::PipelineError;
pub use models::{
    BatchReport, DescriptorEntry, FilePart, ModelMetadata, ModelOutcome, ModelReport,
    ThumbnailStatus, UploadPayload, UploadResult,
};
pub use payload::PayloadBuilder;
pub use processor::PipelineDriver;
pub use renderer::GazeboRenderer;
pub use thumbnail::ThumbnailGenerator;
pub use uploader::Uploader;
