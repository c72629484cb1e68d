//! Runtime settings for biome switch tree tools.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap,
//! and tolerate missing or unknown fields so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, ClassifyConfig, CompileConfig, Config, DebugConfig, DemoConfig};
pub use error::ConfigError;
