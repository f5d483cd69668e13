//! Register command

use anyhow::bail;
use clap::Args;
use tracing::info;

use liftoff_connect::bundle;

use super::print_manual_app_steps;
use crate::cli::{app_identity, connect, output, run_async, Cli};

/// Register the bundle identifier in the developer portal
#[derive(Debug, Args)]
pub struct RegisterCommand {}

impl RegisterCommand {
    /// Execute the register command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing register command");
        let config = cli.load_config()?;
        cli.banner("Bundle ID Registration", &config);

        run_async(async {
            let client = connect(&config)?;
            output::success("Connected to App Store Connect API");

            let app = app_identity(&config);
            if !bundle::register_bundle_id(&client, &app).await? {
                bail!("bundle identifier registration failed, see errors above");
            }
            output::success(&format!("Bundle ID '{}' is registered", app.bundle_id));

            match bundle::get_app_id(&client, &app).await? {
                Some(id) => output::success(&format!("App record exists: {}", id)),
                None => print_manual_app_steps(&app),
            }
            anyhow::Ok(())
        })
    }
}
