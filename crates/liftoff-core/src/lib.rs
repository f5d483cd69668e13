//! Liftoff Core - configuration and error types shared by the liftoff crates
//!
//! This crate owns the `liftoff.toml` schema: API credentials, the app's
//! identity, the Xcode build settings and the store-listing directories.

pub mod config;
pub mod error;

pub use config::{
    find_config, load_config, load_config_or_default, read_config,
    validate_build, validate_config, ApiConfig, AppConfig, BuildConfig, Config,
    CredentialsConfig, ListingConfig,
};
pub use error::{ConfigError, CoreError, Result};
