// src/core/config_manager.rs
//! Unified configuration - file settings plus environment overrides

use anyhow::{Context, Result};
use tracing::info;

use crate::core::service_client::{ApiClient, AuthTokens};
use crate::environment::EnvironmentConfig;
use crate::listing::StaticListing;
use crate::types::category::{default_catalog, load_catalog, Category};

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub tokens: AuthTokens,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        Ok(Self::from_environment(environment))
    }

    pub fn from_environment(environment: EnvironmentConfig) -> Self {
        let service = Self::load_service(&environment, |key| std::env::var(key).ok());
        Self {
            environment,
            service,
        }
    }

    /// Apply `AMICA_API_URL`, `AMICA_ACCESS_TOKEN` and `AMICA_REFRESH_TOKEN` on top of the file settings
    fn load_service(
        environment: &EnvironmentConfig,
        var: impl Fn(&str) -> Option<String>,
    ) -> ServiceConfig {
        let api_base_url = var("AMICA_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| environment.api_base_url.clone());
        info!("API base URL: {}", api_base_url);

        ServiceConfig {
            api_base_url,
            timeout_seconds: environment.timeout_seconds,
            tokens: AuthTokens {
                access: var("AMICA_ACCESS_TOKEN").filter(|v| !v.is_empty()),
                refresh: var("AMICA_REFRESH_TOKEN").filter(|v| !v.is_empty()),
            },
        }
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        let client = ApiClient::new(
            self.service.api_base_url.clone(),
            self.service.timeout_seconds,
        )
        .context("Failed to create HTTP client")?;
        Ok(client.with_tokens(self.service.tokens.clone()))
    }

    /// Category table from the configured file, or the built-in one
    pub fn categories(&self) -> Result<Vec<Category>> {
        match &self.environment.categories_path {
            Some(path) => load_catalog(path),
            None => Ok(default_catalog()),
        }
    }

    pub fn category_listing(&self) -> Result<StaticListing<Category>> {
        Ok(StaticListing::new(self.categories()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AMICA_API_URL", "https://staging.example/api"),
            ("AMICA_ACCESS_TOKEN", "tok"),
            ("AMICA_REFRESH_TOKEN", ""),
        ]
        .into();
        let service = ConfigManager::load_service(&EnvironmentConfig::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(service.api_base_url, "https://staging.example/api");
        assert_eq!(service.tokens.access.as_deref(), Some("tok"));
        assert_eq!(service.tokens.refresh, None);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let service = ConfigManager::load_service(&EnvironmentConfig::default(), |_| None);
        assert_eq!(service.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(service.timeout_seconds, 30);
        assert_eq!(service.tokens, AuthTokens::default());
    }

    #[test]
    fn test_builtin_categories() {
        let config = ConfigManager {
            environment: EnvironmentConfig::default(),
            service: ServiceConfig::default(),
        };
        assert_eq!(config.categories().unwrap().len(), 14);
    }
}
