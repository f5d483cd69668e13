//! CLI commands

mod build;
mod init;
mod metadata;
mod register;
mod release;
mod screenshots;

pub use build::BuildCommand;
pub use init::InitCommand;
pub use metadata::MetadataCommand;
pub use register::RegisterCommand;
pub use release::ReleaseCommand;
pub use screenshots::ScreenshotsCommand;

use anyhow::bail;
use liftoff_connect::{bundle, AppIdentity, ConnectClient};

use crate::cli::output;

/// Resolve the app id, printing the manual runbook when the app is missing
pub(crate) async fn require_app_id(
    client: &ConnectClient,
    app: &AppIdentity,
) -> anyhow::Result<String> {
    match bundle::get_app_id(client, app).await? {
        Some(id) => {
            output::success(&format!("Found app: {}", id));
            Ok(id)
        }
        None => {
            output::error("App not found in App Store Connect");
            print_manual_app_steps(app);
            bail!("create the app in App Store Connect, then run this command again");
        }
    }
}

pub(crate) fn print_manual_app_steps(app: &AppIdentity) {
    output::warning("Manual step required (one time only)");
    println!("  Apps cannot be created through the App Store Connect API.");
    output::steps("Create the app:", &bundle::manual_app_steps(app));
}
