//! Configuration and JSON:API wire types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// App Store Connect API key
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API Key ID
    pub key_id: String,

    /// API Key Issuer ID
    pub issuer_id: String,

    /// Path to the `.p8` private key
    pub key_file: PathBuf,
}

/// The app being published, identified by its bundle identifier
#[derive(Debug, Clone)]
pub struct AppIdentity {
    /// Bundle identifier (e.g. `com.example.app`)
    pub bundle_id: String,

    /// Display name
    pub name: String,

    /// SKU used when creating the app record by hand
    pub sku: String,
}

/// A JSON:API resource object
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub attributes: A,
}

/// A document whose `data` member is a list. Absent `data` reads as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct ListDocument<A> {
    #[serde(default = "Vec::new")]
    pub data: Vec<Resource<A>>,
}

impl<A> ListDocument<A> {
    /// First resource of the list, the only one these workflows look at
    pub fn into_first(self) -> Option<Resource<A>> {
        self.data.into_iter().next()
    }
}

/// A document whose `data` member is a single resource
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct SingleDocument<A> {
    pub data: Resource<A>,
}

/// Attributes nobody reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ignored {}

/// `appStoreVersions` attributes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionAttributes {
    pub version_string: Option<String>,
    pub app_store_state: Option<String>,
    pub platform: Option<String>,
}

/// `builds` attributes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildAttributes {
    pub version: Option<String>,
    pub uploaded_date: Option<String>,
    pub processing_state: Option<String>,
}

/// `appStoreVersionLocalizations` attributes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalizationAttributes {
    pub locale: Option<String>,
}

/// `appScreenshotSets` attributes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotSetAttributes {
    pub screenshot_display_type: Option<String>,
}

/// `appScreenshots` attributes returned by a reservation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotAttributes {
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub upload_operations: Vec<UploadOperation>,
}

/// One byte range of a reserved upload and where to send it
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOperation {
    pub url: String,
    pub offset: u64,
    pub length: u64,
    #[serde(default)]
    pub request_headers: Vec<HttpHeader>,
}

/// A header the upload target expects
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

/// An App Store version that can still be edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreVersion {
    pub id: String,
    pub version_string: String,
}
