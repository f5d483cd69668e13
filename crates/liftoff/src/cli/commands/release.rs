//! Release command

use anyhow::bail;
use clap::Args;
use tracing::info;

use liftoff_connect::{metadata, version};

use super::require_app_id;
use crate::cli::{app_identity, connect, output, run_async, Cli};

/// Prepare a store version with the latest build
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Version to create (default: the version already being prepared)
    #[arg(value_name = "VERSION")]
    pub marketing_version: Option<String>,

    /// Submit the version for App Store review
    #[arg(long)]
    pub submit: bool,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.marketing_version, submit = self.submit, "executing release command");
        let config = cli.load_config()?;
        cli.banner("Release", &config);

        run_async(async {
            let client = connect(&config)?;
            let app_id = require_app_id(&client, &app_identity(&config)).await?;

            let version_id = match &self.marketing_version {
                Some(requested) => version::create_version(&client, &app_id, requested).await?,
                None => version::find_editable_version(&client, &app_id)
                    .await?
                    .map(|v| v.id),
            };
            let Some(version_id) = version_id else {
                bail!("no store version to release");
            };
            output::success(&format!("Using version {}", version_id));

            if metadata::upload_version_info(&client, &version_id, &config.listing.metadata_dir)
                .await?
            {
                output::success("Version metadata uploaded");
            } else {
                output::warning("Version metadata upload had issues");
            }

            let Some(build_id) = version::latest_build(&client, &app_id).await? else {
                bail!("no builds found; wait for processing to finish and run again");
            };
            output::success(&format!("Found build {}", build_id));

            if !version::attach_build(&client, &version_id, &build_id).await? {
                bail!("failed to attach build, see errors above");
            }
            output::success("Build attached to version");

            if self.submit {
                if !version::submit_for_review(&client, &version_id).await? {
                    bail!("review submission failed, see errors above");
                }
                output::success("Submitted for review");
            } else if !cli.quiet {
                output::info("Run again with --submit to file the review submission");
            }
            anyhow::Ok(())
        })
    }
}
