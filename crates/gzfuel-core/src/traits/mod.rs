//! Capability traits defined in `gzfuel-core` and implemented by other crates.

pub mod renderer;

pub use renderer::ThumbnailRenderer;
