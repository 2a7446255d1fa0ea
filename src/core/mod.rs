// src/core/mod.rs
//! Core services shared by the library and the CLI

pub mod config_manager;
pub mod error;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use error::{FetchError, FieldErrors};
pub use service_client::{ApiClient, AuthTokens, JobQuery, SaveOutcome};
