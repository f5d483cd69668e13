//! Metadata command

use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::Args;
use tracing::info;

use liftoff_connect::{metadata, version, ConnectClient};

use super::require_app_id;
use crate::cli::{app_identity, connect, output, run_async, Cli};

/// Upload app info and version text from the metadata directory
#[derive(Debug, Args)]
pub struct MetadataCommand {
    /// Metadata directory (default from configuration)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl MetadataCommand {
    /// Execute the metadata command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing metadata command");
        let config = cli.load_config()?;
        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| config.listing.metadata_dir.clone());
        cli.banner("Metadata Upload", &config);

        run_async(async {
            let client = connect(&config)?;
            let app_id = require_app_id(&client, &app_identity(&config)).await?;
            upload_listing(&client, &app_id, &dir).await
        })
    }
}

/// Push app info text, then version text when a version is waiting.
///
/// No editable version is not a failure: app info is already up and the
/// version text follows once a version exists.
async fn upload_listing(client: &ConnectClient, app_id: &str, dir: &Path) -> anyhow::Result<()> {
    if metadata::upload_app_info(client, app_id, dir).await? {
        output::success("App info metadata uploaded");
    } else {
        output::warning("App info upload had issues");
    }

    let Some(store_version) = version::find_editable_version(client, app_id).await? else {
        output::warning("No version found in PREPARE_FOR_SUBMISSION state");
        output::info(
            "Create a version with `liftoff release <version>`, then run this again to upload version metadata",
        );
        return Ok(());
    };
    output::success(&format!(
        "Found version {}",
        output::version_style().apply_to(&store_version.version_string)
    ));

    if !metadata::upload_version_info(client, &store_version.id, dir).await? {
        bail!("version metadata upload failed, see errors above");
    }
    output::success("Version metadata uploaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{GET, PATCH};
    use httpmock::MockServer;
    use liftoff_connect::AuthToken;
    use serde_json::json;
    use tempfile::TempDir;

    fn client(server: &MockServer) -> ConnectClient {
        ConnectClient::with_token(AuthToken::from_static("test-token"))
            .with_base_url(server.url("/v1"))
    }

    async fn mock_app_info(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/apps/A1/appInfos");
                then.status(200).json_body(json!({"data": [{ "id": "INFO1" }]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/appInfos/INFO1/appInfoLocalizations");
                then.status(200).json_body(json!({"data": [{ "id": "AIL1" }]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/v1/appInfoLocalizations/AIL1");
                then.status(200).json_body(json!({"data": { "id": "AIL1" }}));
            })
            .await;
    }

    #[tokio::test]
    async fn test_no_editable_version_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("name.txt"), "Slide Cast").unwrap();
        std::fs::write(temp.path().join("description.txt"), "Slideshows.").unwrap();

        let server = MockServer::start_async().await;
        mock_app_info(&server).await;
        let versions = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/apps/A1/appStoreVersions");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;

        upload_listing(&client(&server), "A1", temp.path())
            .await
            .unwrap();
        versions.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_version_text_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("description.txt"), "Slideshows.").unwrap();

        let server = MockServer::start_async().await;
        mock_app_info(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/apps/A1/appStoreVersions");
                then.status(200).json_body(json!({"data": [{
                    "id": "V1",
                    "attributes": { "versionString": "1.0", "appStoreState": "PREPARE_FOR_SUBMISSION" }
                }]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/appStoreVersions/V1/appStoreVersionLocalizations");
                then.status(200).json_body(json!({"data": [{ "id": "VL1" }]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/v1/appStoreVersionLocalizations/VL1");
                then.status(409).body("conflict");
            })
            .await;

        assert!(upload_listing(&client(&server), "A1", temp.path())
            .await
            .is_err());
    }
}
