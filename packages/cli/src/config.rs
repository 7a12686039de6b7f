use pageblocks_editor::SurfaceConfig;
use pageblocks_model::{ParseMode, ValidationConfig, MAX_NESTING_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pageblocks.config.json";

/// Pageblocks configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Maximum Columns nesting accepted by validation
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Reject unknown fields instead of ignoring them
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Settings for embedders that mount editor surfaces on these pages.
    /// The CLI reads only `defaultAlignment` (`fmt --fill-alignment`); the
    /// width range and step are carried for the surfaces.
    #[serde(default)]
    pub surface: SurfaceConfig,
}

fn default_max_depth() -> usize {
    MAX_NESTING_DEPTH
}

fn default_strict() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            max_depth: self.max_depth,
            mode: if self.strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict: default_strict(),
            surface: SurfaceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageblocks_model::TextAlign;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "maxDepth": 8,
            "strict": false,
            "surface": { "minWidth": 20, "widthStep": 10, "defaultAlignment": "left" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(!config.strict);
        assert_eq!(config.surface.min_width, 20);
        assert_eq!(config.surface.max_width, 100);
        assert_eq!(config.surface.width_step, 10);
        assert_eq!(config.surface.default_alignment, TextAlign::Left);

        let validation = config.validation();
        assert_eq!(validation.max_depth, 8);
        assert_eq!(validation.mode, ParseMode::Lenient);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_depth, 32);
        assert!(config.strict);
        assert_eq!(config.surface, SurfaceConfig::default());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }
}
