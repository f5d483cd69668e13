//! Store listing text upload
//!
//! Listing text lives in one flat directory of `.txt` files. Each present file
//! becomes one attribute on a localization resource; absent files are left
//! out of the payload so the store keeps its current value.

use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::client::ConnectClient;
use crate::error::{ApiOutcome, Result};
use crate::types::{Ignored, ListDocument, SingleDocument};

/// A local text file and the attribute it fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataField {
    pub file: &'static str,
    pub attribute: &'static str,
}

/// Fields on the app info localization
pub const APP_INFO_FIELDS: &[MetadataField] = &[
    MetadataField { file: "name.txt", attribute: "name" },
    MetadataField { file: "subtitle.txt", attribute: "subtitle" },
    MetadataField { file: "privacy_url.txt", attribute: "privacyPolicyUrl" },
];

/// Fields on the version localization.
///
/// `whatsNew` is rejected on a first version, so release notes are not sent.
pub const VERSION_FIELDS: &[MetadataField] = &[
    MetadataField { file: "description.txt", attribute: "description" },
    MetadataField { file: "keywords.txt", attribute: "keywords" },
    MetadataField { file: "promotional_text.txt", attribute: "promotionalText" },
    MetadataField { file: "support_url.txt", attribute: "supportUrl" },
    MetadataField { file: "marketing_url.txt", attribute: "marketingUrl" },
];

/// Read a text file, returning `None` if it does not exist
async fn read_text_file(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Collect the attributes for every field whose file exists in `dir`
pub async fn read_fields(dir: &Path, fields: &[MetadataField]) -> Result<Map<String, Value>> {
    let mut attributes = Map::new();

    for field in fields {
        match read_text_file(&dir.join(field.file)).await? {
            Some(text) => {
                attributes.insert(field.attribute.to_string(), Value::String(text));
            }
            None => debug!(file = field.file, "metadata file not present"),
        }
    }

    Ok(attributes)
}

/// First localization id under `endpoint`, or `None`
async fn first_id(client: &ConnectClient, endpoint: &str) -> Result<Option<String>> {
    match client
        .get::<ListDocument<Ignored>>(endpoint)
        .await
        .api_outcome()?
    {
        Ok(list) => Ok(list.into_first().map(|r| r.id)),
        Err(failure) => {
            warn!(endpoint, "lookup failed: {}", failure);
            Ok(None)
        }
    }
}

fn localization_patch(kind: &str, id: &str, attributes: Map<String, Value>) -> Value {
    json!({
        "data": {
            "type": kind,
            "id": id,
            "attributes": attributes
        }
    })
}

/// Upload app-level text (name, subtitle, privacy policy URL).
///
/// A rejected PATCH is reported but does not fail the upload.
pub async fn upload_app_info(client: &ConnectClient, app_id: &str, dir: &Path) -> Result<bool> {
    info!("uploading app info metadata");

    let Some(app_info_id) = first_id(client, &format!("apps/{}/appInfos", app_id)).await? else {
        error!("could not find app info");
        return Ok(false);
    };

    let Some(localization_id) = first_id(
        client,
        &format!("appInfos/{}/appInfoLocalizations", app_info_id),
    )
    .await?
    else {
        error!("could not find app info localization");
        return Ok(false);
    };

    let attributes = read_fields(dir, APP_INFO_FIELDS).await?;
    debug!(fields = attributes.len(), "app info attributes read");
    let body = localization_patch("appInfoLocalizations", &localization_id, attributes);

    match client
        .patch::<SingleDocument<Ignored>>(
            &format!("appInfoLocalizations/{}", localization_id),
            &body,
        )
        .await
        .api_outcome()?
    {
        Ok(_) => info!("app info metadata uploaded"),
        Err(failure) => warn!("app info upload failed: {}", failure),
    }

    Ok(true)
}

/// Upload version-level text (description, keywords, promotional text, URLs)
pub async fn upload_version_info(
    client: &ConnectClient,
    version_id: &str,
    dir: &Path,
) -> Result<bool> {
    info!("uploading version metadata");

    let Some(localization_id) = first_id(
        client,
        &format!("appStoreVersions/{}/appStoreVersionLocalizations", version_id),
    )
    .await?
    else {
        error!("could not find version localization");
        return Ok(false);
    };

    let attributes = read_fields(dir, VERSION_FIELDS).await?;
    debug!(fields = attributes.len(), "version attributes read");
    let body = localization_patch("appStoreVersionLocalizations", &localization_id, attributes);

    match client
        .patch::<SingleDocument<Ignored>>(
            &format!("appStoreVersionLocalizations/{}", localization_id),
            &body,
        )
        .await
        .api_outcome()?
    {
        Ok(_) => {
            info!("version metadata uploaded");
            Ok(true)
        }
        Err(failure) => {
            error!("version metadata upload failed: {}", failure);
            Ok(false)
        }
    }
}
