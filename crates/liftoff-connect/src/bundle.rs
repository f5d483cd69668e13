//! Bundle identifier registration and app lookup

use serde_json::json;
use tracing::{error, info, warn};

use crate::client::ConnectClient;
use crate::error::{ApiOutcome, Result};
use crate::types::{AppIdentity, Ignored, ListDocument, SingleDocument};

/// Web console where apps are created by hand
pub const CONSOLE_URL: &str = "https://appstoreconnect.apple.com";

/// Register the bundle identifier in the developer portal.
///
/// Returns `true` when the identifier already exists or was just created.
pub async fn register_bundle_id(client: &ConnectClient, app: &AppIdentity) -> Result<bool> {
    info!(bundle_id = %app.bundle_id, "registering bundle identifier");

    let existing: ListDocument<Ignored> = client
        .get(&format!("bundleIds?filter[identifier]={}", app.bundle_id))
        .await
        .api_outcome()?
        .unwrap_or_else(|failure| {
            warn!("bundle identifier lookup failed: {}", failure);
            ListDocument { data: Vec::new() }
        });

    if !existing.data.is_empty() {
        info!("bundle identifier already registered");
        return Ok(true);
    }

    let body = json!({
        "data": {
            "type": "bundleIds",
            "attributes": {
                "name": app.name,
                "identifier": app.bundle_id,
                "platform": "IOS"
            }
        }
    });

    match client
        .post::<SingleDocument<Ignored>>("bundleIds", &body)
        .await
        .api_outcome()?
    {
        Ok(created) => {
            info!(id = %created.data.id, "bundle identifier registered");
            Ok(true)
        }
        Err(failure) => {
            error!("failed to register bundle identifier: {}", failure);
            Ok(false)
        }
    }
}

/// Resolve the app record for the bundle identifier.
///
/// Apps cannot be created through the API. A `None` here means somebody has
/// to follow [`manual_app_steps`] before anything else can run.
pub async fn get_app_id(client: &ConnectClient, app: &AppIdentity) -> Result<Option<String>> {
    info!(bundle_id = %app.bundle_id, "looking up app");

    let apps: ListDocument<Ignored> = match client
        .get(&format!("apps?filter[bundleId]={}", app.bundle_id))
        .await
        .api_outcome()?
    {
        Ok(apps) => apps,
        Err(failure) => {
            warn!("app lookup failed: {}", failure);
            return Ok(None);
        }
    };

    match apps.into_first() {
        Some(found) => {
            info!(app_id = %found.id, "found app");
            Ok(Some(found.id))
        }
        None => {
            warn!(bundle_id = %app.bundle_id, "app not found");
            Ok(None)
        }
    }
}

/// Steps for creating the app record in the web console
pub fn manual_app_steps(app: &AppIdentity) -> Vec<String> {
    vec![
        format!("Go to {}", CONSOLE_URL),
        "Open Apps, press + and choose New App".to_string(),
        "Platform: iOS".to_string(),
        format!("Name: {}", app.name),
        "Primary language: English (U.S.)".to_string(),
        format!("Bundle ID: {} (listed once registered)", app.bundle_id),
        format!("SKU: {}", app.sku),
        "User access: Full Access".to_string(),
        "Then run this command again".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthToken;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;

    fn client(server: &MockServer) -> ConnectClient {
        ConnectClient::with_token(AuthToken::from_static("test-token"))
            .with_base_url(server.url("/v1"))
    }

    fn app() -> AppIdentity {
        AppIdentity {
            bundle_id: "com.example.cast".to_string(),
            name: "SlideCast".to_string(),
            sku: "slidecast-2025".to_string(),
        }
    }

    #[tokio::test]
    async fn test_existing_bundle_id_skips_create() {
        let server = MockServer::start_async().await;
        let lookup = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/bundleIds")
                    .query_param("filter[identifier]", "com.example.cast");
                then.status(200)
                    .json_body(json!({"data": [{"type": "bundleIds", "id": "B1"}]}));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/bundleIds");
                then.status(201).json_body(json!({"data": {"id": "B2"}}));
            })
            .await;

        assert!(register_bundle_id(&client(&server), &app()).await.unwrap());
        lookup.assert_async().await;
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_missing_bundle_id_is_created() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/bundleIds");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/bundleIds").json_body(json!({
                    "data": {
                        "type": "bundleIds",
                        "attributes": {
                            "name": "SlideCast",
                            "identifier": "com.example.cast",
                            "platform": "IOS"
                        }
                    }
                }));
                then.status(201)
                    .json_body(json!({"data": {"type": "bundleIds", "id": "B2"}}));
            })
            .await;

        assert!(register_bundle_id(&client(&server), &app()).await.unwrap());
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_conflict_returns_false() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/bundleIds");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/bundleIds");
                then.status(409).body("identifier is not available");
            })
            .await;

        assert!(!register_bundle_id(&client(&server), &app()).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_app_id_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/apps")
                    .query_param("filter[bundleId]", "com.example.cast");
                then.status(200)
                    .json_body(json!({"data": [{"type": "apps", "id": "6700000001"}]}));
            })
            .await;

        let id = get_app_id(&client(&server), &app()).await.unwrap();
        assert_eq!(id.as_deref(), Some("6700000001"));
    }

    #[tokio::test]
    async fn test_get_app_id_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/apps");
                then.status(200).json_body(json!({"data": []}));
            })
            .await;

        assert_eq!(get_app_id(&client(&server), &app()).await.unwrap(), None);
    }

    #[test]
    fn test_manual_steps_mention_identity() {
        let steps = manual_app_steps(&app());
        assert!(steps.iter().any(|s| s.contains("SlideCast")));
        assert!(steps.iter().any(|s| s.contains("com.example.cast")));
        assert!(steps.iter().any(|s| s.contains("slidecast-2025")));
        assert!(steps[0].contains(CONSOLE_URL));
    }
}
