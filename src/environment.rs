// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::service_client::DEFAULT_BASE_URL;

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// YAML category table; the built-in catalog is used when absent
    #[serde(default)]
    pub categories_path: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: default_timeout(),
            categories_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration for the current environment from `config.yaml` in
    /// the working directory, falling back to built-in local defaults.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from(CONFIG_FILE);
        if !config_path.exists() {
            info!("{} not found, using built-in defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path, &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("AMICA_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config_file: ConfigFile = serde_yaml::from_str(&config_content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        if env_config.api_base_url.trim().is_empty() {
            anyhow::bail!("api_base_url must not be empty ({})", environment);
        }

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            categories_path: env_config
                .categories_path
                .as_ref()
                .map(|p| Self::resolve_path(&base_dir, p))
                .transpose()?,
            ..env_config
        })
    }

    fn resolve_path(base_dir: &Path, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else if base_dir.as_os_str().is_empty() {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        } else {
            Ok(base_dir.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
local:
  api_base_url: http://127.0.0.1:8000/api
  categories_path: categories.yaml
production:
  api_base_url: https://amica.example/api
  timeout_seconds: 10
"#;

    #[test]
    fn test_load_local_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        let config = EnvironmentConfig::load_from_file(&path, "local").unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(
            config.categories_path,
            Some(dir.path().join("categories.yaml"))
        );
    }

    #[test]
    fn test_load_production_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = EnvironmentConfig::load_from_file(&path, "production").unwrap();
        assert_eq!(config.api_base_url, "https://amica.example/api");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.categories_path, None);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "local: [").unwrap();
        assert!(EnvironmentConfig::load_from_file(&path, "local").is_err());
    }
}
