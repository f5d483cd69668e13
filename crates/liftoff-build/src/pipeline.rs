//! Version bump, archive, export and upload

use std::path::{Path, PathBuf};

use liftoff_core::Config;
use tracing::{debug, error, info};

use crate::error::{BuildError, Result};
use crate::runner::{CommandRunner, ToolCommand};

/// Environment variable the upload tool reads to find `AuthKey_<id>.p8`
pub const PRIVATE_KEYS_DIR_ENV: &str = "API_PRIVATE_KEYS_DIR";

/// Everything the build steps need, with paths resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub scheme: String,
    pub archive_path: PathBuf,
    pub export_path: PathBuf,
    pub ipa_name: String,
    pub export_options: PathBuf,
    pub key_id: String,
    pub issuer_id: String,
    pub key_file: PathBuf,
}

impl BuildSettings {
    /// Resolve settings from configuration, relative paths against `root`
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let build = &config.build;
        Self {
            scheme: build.scheme.clone(),
            archive_path: root.join(build.archive_path(&config.app)),
            export_path: root.join(build.export_path()),
            ipa_name: build.ipa_name(),
            export_options: root.join(build.export_options()),
            key_id: config.credentials.key_id.clone(),
            issuer_id: config.credentials.issuer_id.clone(),
            key_file: root.join(config.credentials.key_file_path()),
        }
    }

    /// Where the export step leaves the IPA
    pub fn ipa_path(&self) -> PathBuf {
        self.export_path.join(&self.ipa_name)
    }

    /// Directory holding the private key
    pub fn key_dir(&self) -> PathBuf {
        match self.key_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// The four build steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    UpdateVersionNumbers,
    BuildArchive,
    ExportIpa,
    UploadBuild,
}

impl BuildStep {
    pub const ALL: [BuildStep; 4] = [
        BuildStep::UpdateVersionNumbers,
        BuildStep::BuildArchive,
        BuildStep::ExportIpa,
        BuildStep::UploadBuild,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuildStep::UpdateVersionNumbers => "Update version numbers",
            BuildStep::BuildArchive => "Build archive",
            BuildStep::ExportIpa => "Export IPA",
            BuildStep::UploadBuild => "Upload to App Store",
        }
    }
}

/// Drives the Xcode toolchain through a [`CommandRunner`]
pub struct BuildPipeline<R> {
    settings: BuildSettings,
    runner: R,
}

impl<R: CommandRunner> BuildPipeline<R> {
    pub fn new(settings: BuildSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one command, turning a non-zero exit into an error
    async fn execute(&self, command: ToolCommand) -> Result<()> {
        let output = self.runner.run(&command).await?;
        if !output.stdout.is_empty() {
            debug!("{}", output.stdout.trim_end());
        }

        if !output.success {
            if !output.stderr.is_empty() {
                error!("{}", output.stderr.trim_end());
            }
            return Err(BuildError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(())
    }

    /// Set the marketing version and the build number of every target
    pub async fn update_version_numbers(&self, version: &str, build: &str) -> Result<()> {
        info!(version, build, "updating version numbers");
        self.execute(ToolCommand::new("xcrun").args(["agvtool", "new-marketing-version", version]))
            .await?;
        self.execute(ToolCommand::new("xcrun").args(["agvtool", "new-version", "-all", build]))
            .await?;
        info!("version updated");
        Ok(())
    }

    /// Archive the scheme in Release configuration
    pub async fn build_archive(&self) -> Result<()> {
        info!(scheme = %self.settings.scheme, "building archive");
        if let Some(parent) = self.settings.archive_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let archive_path = self.settings.archive_path.display().to_string();
        self.execute(ToolCommand::new("xcodebuild").args([
            "-scheme",
            self.settings.scheme.as_str(),
            "-configuration",
            "Release",
            "-archivePath",
            archive_path.as_str(),
            "-destination",
            "generic/platform=iOS",
            "archive",
        ]))
        .await?;
        info!("archive built");
        Ok(())
    }

    /// Export an IPA from the archive
    pub async fn export_ipa(&self) -> Result<()> {
        info!("exporting IPA");
        let archive_path = self.settings.archive_path.display().to_string();
        let export_path = self.settings.export_path.display().to_string();
        let export_options = self.settings.export_options.display().to_string();

        self.execute(ToolCommand::new("xcodebuild").args([
            "-exportArchive",
            "-archivePath",
            archive_path.as_str(),
            "-exportPath",
            export_path.as_str(),
            "-exportOptionsPlist",
            export_options.as_str(),
        ]))
        .await?;
        info!("IPA exported");
        Ok(())
    }

    /// Upload the exported IPA with the platform's upload tool
    pub async fn upload_build(&self) -> Result<()> {
        info!("uploading build");
        let ipa_path = self.settings.ipa_path();
        if !ipa_path.exists() {
            return Err(BuildError::ArtifactNotFound {
                expected_path: ipa_path,
            });
        }

        let ipa = ipa_path.display().to_string();
        let command = ToolCommand::new("xcrun")
            .args([
                "altool",
                "--upload-app",
                "-f",
                ipa.as_str(),
                "--type",
                "ios",
                "--apiKey",
                self.settings.key_id.as_str(),
                "--apiIssuer",
                self.settings.issuer_id.as_str(),
            ])
            .env(
                PRIVATE_KEYS_DIR_ENV,
                self.settings.key_dir().display().to_string(),
            );
        self.execute(command).await?;
        info!("build uploaded, processing may take a few minutes");
        Ok(())
    }

    async fn run_step(&self, step: BuildStep, version: &str, build: &str) -> Result<()> {
        match step {
            BuildStep::UpdateVersionNumbers => self.update_version_numbers(version, build).await,
            BuildStep::BuildArchive => self.build_archive().await,
            BuildStep::ExportIpa => self.export_ipa().await,
            BuildStep::UploadBuild => self.upload_build().await,
        }
    }

    /// Run every step in order, stopping at the first failure
    pub async fn build_and_upload(&self, version: &str, build: &str) -> bool {
        for step in BuildStep::ALL {
            if let Err(e) = self.run_step(step, version, build).await {
                match &e {
                    BuildError::CommandFailed { command, exit_code, .. } => {
                        error!(command = %command, exit_code = ?exit_code, "{}", e);
                    }
                    _ => error!("{}", e),
                }
                error!("Build failed at: {}", step.name());
                return false;
            }
        }
        true
    }
}
