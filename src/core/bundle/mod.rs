pub mod config;
pub mod pipeline;

pub use config::{BundleConfig, DEFAULT_GAME_VERSION};
pub use pipeline::{BundleOutcome, BundlePipeline};
