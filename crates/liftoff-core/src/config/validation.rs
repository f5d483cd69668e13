//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate the settings every command depends on
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_credentials(config)?;
    validate_app(config)?;
    validate_api(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field.to_string()).into());
    }
    Ok(())
}

/// Credentials are needed by every command that talks to the API
pub fn validate_credentials(config: &Config) -> Result<()> {
    require(&config.credentials.key_id, "credentials.key_id")?;
    require(&config.credentials.issuer_id, "credentials.issuer_id")?;
    Ok(())
}

/// The bundle identifier is the natural key of every lookup
pub fn validate_app(config: &Config) -> Result<()> {
    require(&config.app.bundle_id, "app.bundle_id")?;

    if config.app.bundle_id.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "app.bundle_id".to_string(),
            message: "must not contain whitespace".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_api(config: &Config) -> Result<()> {
    let url = &config.api.base_url;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            message: "must be an http(s) URL".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Only the build command needs a scheme
pub fn validate_build(config: &Config) -> Result<()> {
    require(&config.build.scheme, "build.scheme")
}
