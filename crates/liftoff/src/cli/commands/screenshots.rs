//! Screenshots command

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use tracing::info;

use liftoff_connect::{screenshots, version};

use super::require_app_id;
use crate::cli::{app_identity, connect, output, run_async, Cli};

/// Replace the store screenshots with the PNG files on disk
#[derive(Debug, Args)]
pub struct ScreenshotsCommand {
    /// Screenshot directory (default from configuration)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl ScreenshotsCommand {
    /// Execute the screenshots command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(dir = ?self.dir, "executing screenshots command");
        let config = cli.load_config()?;
        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| config.listing.screenshots_dir.clone());
        cli.banner("Screenshot Upload", &config);

        if !cli.quiet {
            for group in screenshots::group_screenshots(&dir).unwrap_or_default() {
                println!(
                    "{}",
                    output::key_value(group.class.display_type(), &group.files.len().to_string())
                );
            }
        }

        run_async(async {
            let client = connect(&config)?;
            let app_id = require_app_id(&client, &app_identity(&config)).await?;

            let Some(store_version) = version::find_editable_version(&client, &app_id).await?
            else {
                bail!("no version waiting for submission, run `liftoff release <version>` first");
            };
            output::info(&format!("Uploading to version {}", store_version.version_string));

            if !screenshots::upload_screenshots(&client, &store_version.id, &dir).await? {
                bail!("some screenshots failed to upload, see errors above");
            }
            output::success("All screenshots uploaded");
            anyhow::Ok(())
        })
    }
}
