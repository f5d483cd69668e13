//! Store versions, builds and review submissions

use serde_json::json;
use tracing::{error, info, warn};

use crate::client::ConnectClient;
use crate::error::{ApiOutcome, Result};
use crate::types::{
    BuildAttributes, Ignored, ListDocument, SingleDocument, StoreVersion, VersionAttributes,
};

/// State of a version that can still be edited and submitted
pub const EDITABLE_STATE: &str = "PREPARE_FOR_SUBMISSION";

/// Create the store version, reusing it if it already exists
pub async fn create_version(
    client: &ConnectClient,
    app_id: &str,
    version: &str,
) -> Result<Option<String>> {
    info!(version, "creating store version");

    let body = json!({
        "data": {
            "type": "appStoreVersions",
            "attributes": {
                "platform": "IOS",
                "versionString": version
            },
            "relationships": {
                "app": {
                    "data": { "type": "apps", "id": app_id }
                }
            }
        }
    });

    let failure = match client
        .post::<SingleDocument<Ignored>>("appStoreVersions", &body)
        .await
        .api_outcome()?
    {
        Ok(created) => {
            info!(version_id = %created.data.id, "version created");
            return Ok(Some(created.data.id));
        }
        Err(failure) => failure,
    };

    if failure.is_already_exists() {
        info!(version, "version already exists, fetching it");
        let endpoint = format!(
            "apps/{}/appStoreVersions?filter[versionString]={}&filter[appStoreState]={}",
            app_id, version, EDITABLE_STATE
        );
        if let Ok(existing) = client
            .get::<ListDocument<Ignored>>(&endpoint)
            .await
            .api_outcome()?
        {
            if let Some(found) = existing.into_first() {
                info!(version_id = %found.id, "using existing version");
                return Ok(Some(found.id));
            }
        }
    }

    error!("failed to create version: {}", failure);
    Ok(None)
}

/// The version currently being prepared for submission, if any
pub async fn find_editable_version(
    client: &ConnectClient,
    app_id: &str,
) -> Result<Option<StoreVersion>> {
    let endpoint = format!(
        "apps/{}/appStoreVersions?filter[appStoreState]={}&filter[platform]=IOS",
        app_id, EDITABLE_STATE
    );

    let versions: ListDocument<VersionAttributes> =
        match client.get(&endpoint).await.api_outcome()? {
            Ok(versions) => versions,
            Err(failure) => {
                warn!("version lookup failed: {}", failure);
                return Ok(None);
            }
        };

    let Some(found) = versions.into_first() else {
        warn!("no version in {}", EDITABLE_STATE);
        return Ok(None);
    };

    let version = StoreVersion {
        version_string: found.attributes.version_string.unwrap_or_default(),
        id: found.id,
    };
    info!(version_id = %version.id, version = %version.version_string, "found editable version");
    Ok(Some(version))
}

/// Most recently uploaded build of the app.
///
/// Builds appear some minutes after the upload tool finishes. There is no
/// polling; a `None` means run again later.
pub async fn latest_build(client: &ConnectClient, app_id: &str) -> Result<Option<String>> {
    info!("finding latest build");

    let endpoint = format!("builds?filter[app]={}&sort=-uploadedDate&limit=1", app_id);
    let builds: ListDocument<BuildAttributes> = match client.get(&endpoint).await.api_outcome()? {
        Ok(builds) => builds,
        Err(failure) => {
            warn!("build lookup failed: {}", failure);
            return Ok(None);
        }
    };

    match builds.into_first() {
        Some(build) => {
            info!(
                build_id = %build.id,
                build = build.attributes.version.as_deref().unwrap_or("?"),
                "found build"
            );
            Ok(Some(build.id))
        }
        None => {
            error!("no builds found");
            Ok(None)
        }
    }
}

/// Link a build to a store version
pub async fn attach_build(client: &ConnectClient, version_id: &str, build_id: &str) -> Result<bool> {
    info!(version_id, build_id, "attaching build to version");

    let body = json!({
        "data": {
            "type": "appStoreVersions",
            "id": version_id,
            "relationships": {
                "build": {
                    "data": { "type": "builds", "id": build_id }
                }
            }
        }
    });

    match client
        .patch::<SingleDocument<Ignored>>(&format!("appStoreVersions/{}", version_id), &body)
        .await
        .api_outcome()?
    {
        Ok(_) => {
            info!("build attached to version");
            Ok(true)
        }
        Err(failure) => {
            error!("failed to attach build: {}", failure);
            Ok(false)
        }
    }
}

/// File a review submission for a store version
pub async fn submit_for_review(client: &ConnectClient, version_id: &str) -> Result<bool> {
    info!(version_id, "submitting for review");

    let body = json!({
        "data": {
            "type": "appStoreReviewSubmissions",
            "relationships": {
                "appStoreVersion": {
                    "data": { "type": "appStoreVersions", "id": version_id }
                }
            }
        }
    });

    match client
        .post::<SingleDocument<Ignored>>("appStoreReviewSubmissions", &body)
        .await
        .api_outcome()?
    {
        Ok(_) => {
            info!("submitted for review");
            Ok(true)
        }
        Err(failure) => {
            error!("failed to submit for review: {}", failure);
            Ok(false)
        }
    }
}
