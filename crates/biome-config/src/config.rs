//! Settings structs with defaults, RON persistence and range checks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "biome.ron";

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Switch tree compilation.
    pub compile: CompileConfig,
    /// Grid classification.
    pub classify: ClassifyConfig,
    /// Synthetic terrain used by the demo binary.
    pub demo: DemoConfig,
    /// Logging.
    pub debug: DebugConfig,
}

/// Switch tree compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompileConfig {
    /// Allowed deviation of an axis coverage total from 1.0 before warning.
    pub coverage_tolerance: f32,
    /// Print the compiled tree after building.
    pub dump_tree: bool,
}

/// Grid classification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Maximum unmatched-cell warnings logged per pass.
    pub unmatched_warning_limit: u32,
    /// Nearest biomes blended per cell. Values above 1 are accepted but only
    /// the nearest biome is written.
    pub blend_count: u32,
}

/// Synthetic terrain settings for the demo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Cells per grid side.
    pub grid_size: u32,
    /// World distance between samples.
    pub cell_step: f32,
    /// Noise seed.
    pub seed: u64,
    /// Heights at or below this are under water.
    pub water_level: f32,
    /// Highest terrain height produced by the height noise.
    pub max_height: f32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,biome_switch=trace").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            coverage_tolerance: 1e-4,
            dump_tree: false,
        }
    }
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            unmatched_warning_limit: 300,
            blend_count: 1,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            cell_step: 1.0,
            seed: 0,
            water_level: 20.0,
            max_height: 100.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload / Validate ---

impl Config {
    /// Load settings from the given directory, or write a default file there.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded biome settings from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!(
                "Created default biome settings at {}",
                config_path.display()
            );
            Ok(config)
        }
    }

    /// Save settings to the given directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Biome settings reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Rejects values the classifier or demo cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compile.coverage_tolerance.is_nan() || self.compile.coverage_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "compile.coverage_tolerance",
                reason: format!(
                    "must be non-negative, got {}",
                    self.compile.coverage_tolerance
                ),
            });
        }
        if self.classify.blend_count == 0 {
            return Err(ConfigError::Invalid {
                field: "classify.blend_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.demo.grid_size == 0 {
            return Err(ConfigError::Invalid {
                field: "demo.grid_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.demo.cell_step.is_nan() || self.demo.cell_step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "demo.cell_step",
                reason: format!("must be positive, got {}", self.demo.cell_step),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("unmatched_warning_limit: 300"));
        assert!(ron_str.contains("grid_size: 64"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.compile.dump_tree = true;
        config.demo.seed = 7;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(classify: (blend_count: 2))").unwrap();
        assert_eq!(config.classify.blend_count, 2);
        assert_eq!(config.classify.unmatched_warning_limit, 300);
        assert_eq!(config.demo, DemoConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(volumetric_biomes: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.demo.grid_size = 128;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.classify.unmatched_warning_limit = 10;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(
            reloaded.map(|c| c.classify.unmatched_warning_limit),
            Some(10)
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.classify.blend_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "classify.blend_count", .. })
        ));

        let mut config = Config::default();
        config.compile.coverage_tolerance = f32::NAN;
        assert!(config.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "(demo: (grid_size: 0))").unwrap();
        assert!(Config::load_or_create(dir.path()).is_err());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
