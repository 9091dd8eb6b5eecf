use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{CatalogError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub pipeline: PipelineConfig,
    pub validation: ValidationConfig,
    /// Extra document identities on top of the built-in vendor table.
    pub vendors: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(constants::DEFAULT_INPUT_DIR),
            output: PathBuf::from(constants::DEFAULT_OUTPUT),
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub parallel: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub strict: bool,
}

impl Config {
    /// Load configuration. With no explicit path a missing `config.toml`
    /// falls back to defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(constants::DEFAULT_CONFIG_FILE), false),
        };

        if !required && !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        for (identity, manufacturer) in &config.vendors {
            if identity.trim().is_empty() || manufacturer.trim().is_empty() {
                return Err(CatalogError::Config(format!(
                    "vendor mapping '{}' -> '{}' has an empty side",
                    identity, manufacturer
                )));
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("motor-data"));
        assert_eq!(config.paths.output, PathBuf::from("bot/resources/motors.json"));
        assert!(!config.pipeline.parallel);
        assert!(!config.validation.strict);
        assert!(config.vendors.is_empty());
    }

    #[test]
    fn test_partial_config_overrides_only_given_keys() {
        let config = Config::from_toml(
            r#"
            [paths]
            output = "out/motors.json"

            [validation]
            strict = true

            [vendors]
            "Cesaroni2.rse" = "cesaroni"
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.output, PathBuf::from("out/motors.json"));
        assert_eq!(config.paths.input_dir, PathBuf::from("motor-data"));
        assert!(config.validation.strict);
        assert_eq!(config.vendors.get("Cesaroni2.rse").map(String::as_str), Some("cesaroni"));
    }

    #[test]
    fn test_empty_vendor_mapping_is_rejected() {
        let result = Config::from_toml("[vendors]\n\"X.rse\" = \"\"\n");
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/motor_catalog.toml")));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
