//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Primary variable holding the backend base URL.
pub const ENV_BACKEND_URL: &str = "RATE_ATLAS_BACKEND_URL";
/// Fallback variable holding the backend base URL.
pub const ENV_BACKEND_URL_FALLBACK: &str = "API_BASE_URL";
/// Override for `Access-Control-Allow-Origin`.
pub const ENV_CORS_ORIGIN: &str = "RATE_ATLAS_CORS_ORIGIN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// The TOML file is optional; without one the defaults are used. Environment
/// variables are applied on top of whatever the file provides.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides through `lookup`.
///
/// For the backend URL the first variable that is set wins, even when it is
/// empty; an empty value leaves the gateway unconfigured.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).or_else(|| lookup(ENV_BACKEND_URL_FALLBACK)) {
        config.upstream.backend_url = Some(url).filter(|u| !u.is_empty());
    }

    if let Some(origin) = lookup(ENV_CORS_ORIGIN) {
        config.cors.allow_origin = origin;
    }
}
