//! Build command

use anyhow::bail;
use clap::Args;
use console::style;
use dialoguer::Input;
use tracing::info;

use liftoff_build::{
    check_prerequisites, ensure_export_options, BuildPipeline, BuildSettings, ExportOptions,
    SystemRunner,
};
use liftoff_core::validate_build;

use crate::cli::{output, prompt_error, run_async, Cli};

/// Bump version numbers, archive, export and upload a build
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Marketing version (e.g. 1.2)
    #[arg(value_name = "VERSION")]
    pub marketing_version: Option<String>,

    /// Build number (e.g. 7)
    pub build: Option<String>,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.marketing_version, build = ?self.build, "executing build command");
        let config = cli.load_config()?;
        validate_build(&config)?;
        cli.banner("Build & Upload", &config);

        let (version, build) = match (&self.marketing_version, &self.build) {
            (Some(version), Some(build)) => (version.trim().to_string(), build.trim().to_string()),
            _ => (
                prompt("Version number (e.g. 1.0)", self.marketing_version.as_deref())?,
                prompt("Build number (e.g. 1)", self.build.as_deref())?,
            ),
        };
        if version.is_empty() || build.is_empty() {
            bail!("version and build number are required");
        }

        for tool in check_prerequisites() {
            if !tool.available() {
                output::warning(&format!("{} not found. {}", tool.name, tool.install_hint));
            }
        }

        let root = std::env::current_dir()?;
        let settings = BuildSettings::from_config(&config, &root);
        let options = ExportOptions::app_store(config.app.team_id.clone());
        if ensure_export_options(&settings.export_options, &options)? {
            output::info(&format!(
                "Wrote default export options to {}",
                output::path_style().apply_to(settings.export_options.display())
            ));
        }

        if !cli.quiet {
            println!(
                "Building version {} (build {})",
                output::version_style().apply_to(&version),
                style(&build).bold()
            );
        }

        let pipeline = BuildPipeline::new(settings, SystemRunner::in_dir(&root));
        run_async(async {
            if !pipeline.build_and_upload(&version, &build).await {
                bail!("build or upload failed, see errors above");
            }
            anyhow::Ok(())
        })?;

        output::success(&format!("Build {} ({}) uploaded", version, build));
        if !cli.quiet {
            output::steps(
                "Next steps:",
                &[
                    "Wait 5-15 minutes for the build to process".to_string(),
                    format!("Run `liftoff release {}` to attach it to the store version", version),
                ],
            );
        }
        Ok(())
    }
}

/// Ask for a value unless one was given
fn prompt(label: &str, given: Option<&str>) -> anyhow::Result<String> {
    if let Some(value) = given {
        return Ok(value.trim().to_string());
    }
    let value: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(value.trim().to_string())
}
