//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use liftoff_connect::{AppIdentity, ConnectClient, Credentials};
use liftoff_core::{load_config_or_default, read_config, validate_config, Config};

use commands::{
    BuildCommand, InitCommand, MetadataCommand, RegisterCommand, ReleaseCommand,
    ScreenshotsCommand,
};

/// Liftoff - publish an iOS app to App Store Connect
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search for liftoff.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Values that take precedence over the configuration file
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// App Store Connect API Key ID
    #[arg(long, global = true, env = "APP_STORE_CONNECT_API_KEY_ID")]
    pub api_key_id: Option<String>,

    /// App Store Connect Issuer ID
    #[arg(long, global = true, env = "APP_STORE_CONNECT_ISSUER_ID")]
    pub issuer_id: Option<String>,

    /// Path to API key (.p8 file)
    #[arg(long, global = true, env = "APP_STORE_CONNECT_API_KEY_PATH")]
    pub api_key: Option<PathBuf>,

    /// App bundle ID
    #[arg(long, global = true, env = "LIFTOFF_BUNDLE_ID")]
    pub bundle_id: Option<String>,
}

impl Overrides {
    /// Apply every value that was given
    pub fn apply(&self, config: &mut Config) {
        if let Some(key_id) = &self.api_key_id {
            config.credentials.key_id = key_id.clone();
        }
        if let Some(issuer_id) = &self.issuer_id {
            config.credentials.issuer_id = issuer_id.clone();
        }
        if let Some(key_file) = &self.api_key {
            config.credentials.key_file = Some(key_file.clone());
        }
        if let Some(bundle_id) = &self.bundle_id {
            config.app.bundle_id = bundle_id.clone();
        }
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter liftoff.toml
    Init(InitCommand),

    /// Register the bundle identifier and look up the app
    Register(RegisterCommand),

    /// Bump version numbers, archive, export and upload a build
    Build(BuildCommand),

    /// Upload store listing text
    Metadata(MetadataCommand),

    /// Upload screenshots
    Screenshots(ScreenshotsCommand),

    /// Create the store version, attach the latest build and optionally submit
    Release(ReleaseCommand),
}

/// Returned when the user interrupts a command
#[derive(Debug, thiserror::Error)]
#[error("Cancelled by user")]
pub struct Cancelled;

/// Turn Ctrl-C at an interactive prompt into `Cancelled`
pub fn prompt_error(err: dialoguer::Error) -> anyhow::Error {
    match err {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => Cancelled.into(),
        other => other.into(),
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("cannot change to {}", dir.display()))?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Register(ref cmd) => cmd.execute(&self),
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Metadata(ref cmd) => cmd.execute(&self),
            Commands::Screenshots(ref cmd) => cmd.execute(&self),
            Commands::Release(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load, override and validate the configuration
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => {
                let cwd = std::env::current_dir()?;
                let (config, path) = load_config_or_default(&cwd)?;
                if let Some(path) = path {
                    debug!(path = %path.display(), "using config file");
                }
                config
            }
        };

        self.overrides.apply(&mut config);
        validate_config(&config)?;
        info!(bundle_id = %config.app.bundle_id, "configuration ready");
        Ok(config)
    }

    /// Print the app banner unless quiet
    pub fn banner(&self, title: &str, config: &Config) {
        if self.quiet {
            return;
        }
        println!();
        println!("{}", output::header(title));
        if !config.app.name.is_empty() {
            println!("{}", output::key_value("App", &config.app.name));
        }
        println!("{}", output::key_value("Bundle ID", &config.app.bundle_id));
        println!();
    }
}

/// API credentials from configuration
pub fn credentials(config: &Config) -> Credentials {
    Credentials {
        key_id: config.credentials.key_id.clone(),
        issuer_id: config.credentials.issuer_id.clone(),
        key_file: config.credentials.key_file_path(),
    }
}

/// App identity from configuration
pub fn app_identity(config: &Config) -> AppIdentity {
    AppIdentity {
        bundle_id: config.app.bundle_id.clone(),
        name: config.app.name.clone(),
        sku: config.app.sku_or_default(),
    }
}

/// Authenticated client for the configured API
pub fn connect(config: &Config) -> anyhow::Result<ConnectClient> {
    let client = ConnectClient::new(&credentials(config))?.with_base_url(&config.api.base_url);
    Ok(client)
}

/// Run a command future on a single-threaded runtime, stopping on Ctrl-C
pub fn run_async<F>(future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        tokio::select! {
            result = future => result,
            _ = tokio::signal::ctrl_c() => Err(Cancelled.into()),
        }
    })
}
