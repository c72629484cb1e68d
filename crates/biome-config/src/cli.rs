//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments shared by the biome tools.
///
/// CLI values override settings loaded from `biome.ron`.
#[derive(Parser, Debug)]
#[command(
    name = "biome-demo",
    about = "Compile a biome switch graph and classify a terrain grid"
)]
pub struct CliArgs {
    /// Cells per grid side.
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Noise seed for the synthetic terrain.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum unmatched-cell warnings per pass.
    #[arg(long)]
    pub warning_limit: Option<u32>,

    /// Print the compiled switch tree.
    #[arg(long)]
    pub dump_tree: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to loaded settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.grid_size {
            self.demo.grid_size = size;
        }
        if let Some(seed) = args.seed {
            self.demo.seed = seed;
        }
        if let Some(limit) = args.warning_limit {
            self.classify.unmatched_warning_limit = limit;
        }
        if let Some(dump) = args.dump_tree {
            self.compile.dump_tree = dump;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> CliArgs {
        CliArgs {
            grid_size: None,
            seed: None,
            warning_limit: None,
            dump_tree: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            grid_size: Some(256),
            seed: Some(42),
            log_level: Some("trace".to_string()),
            ..no_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.demo.grid_size, 256);
        assert_eq!(config.demo.seed, 42);
        assert_eq!(config.debug.log_level, "trace");
        // Non-overridden fields retain defaults
        assert_eq!(config.classify.unmatched_warning_limit, 300);
        assert!(!config.compile.dump_tree);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&no_args());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_cli_parses_flags() {
        let argv = ["biome-demo", "--grid-size", "16", "--dump-tree", "true"];
        let args = CliArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.grid_size, Some(16));
        assert_eq!(args.dump_tree, Some(true));
        assert!(args.config.is_none());
    }
}
