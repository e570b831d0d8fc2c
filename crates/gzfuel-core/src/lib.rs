//! # gzfuel-core
//!
//! Core crate for the Fuel model uploader. Contains the unified error
//! system, configuration schemas, and the capability traits that the
//! pipeline crate consumes.
//!
//! This crate has **no** internal dependencies on other uploader crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
