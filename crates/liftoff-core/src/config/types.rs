//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_EXPORT_OPTIONS, DEFAULT_EXPORT_PATH, DEFAULT_KEY_DIR,
    DEFAULT_METADATA_DIR, DEFAULT_SCREENSHOTS_DIR,
};

/// Main configuration for liftoff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// App Store Connect API credentials
    pub credentials: CredentialsConfig,

    /// The app being published
    pub app: AppConfig,

    /// REST API settings
    pub api: ApiConfig,

    /// Local Xcode build settings
    pub build: BuildConfig,

    /// Store listing content on disk
    pub listing: ListingConfig,
}

/// App Store Connect API key configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// API key ID (the `kid` of the signed token)
    pub key_id: String,

    /// Issuer ID of the API key
    pub issuer_id: String,

    /// Path to the `.p8` private key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

impl CredentialsConfig {
    /// Path of the private key, falling back to `deployment/AuthKey_<key_id>.p8`
    pub fn key_file_path(&self) -> PathBuf {
        self.key_file.clone().unwrap_or_else(|| {
            PathBuf::from(DEFAULT_KEY_DIR).join(format!("AuthKey_{}.p8", self.key_id))
        })
    }
}

/// Identity of the app in the developer portal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bundle identifier (e.g. `com.example.app`)
    pub bundle_id: String,

    /// Display name used when registering the bundle identifier
    pub name: String,

    /// SKU shown in the manual app-creation instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Apple developer team ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl AppConfig {
    /// SKU, defaulting to the lowercased app name
    pub fn sku_or_default(&self) -> String {
        self.sku
            .clone()
            .unwrap_or_else(|| self.name.to_lowercase().replace(' ', "-"))
    }
}

/// REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint is joined onto
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Xcode build configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Xcode scheme to archive
    pub scheme: String,

    /// Archive output path (default `build/<app name>.xcarchive`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<PathBuf>,

    /// Directory the IPA is exported into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,

    /// File name of the exported IPA (default `<scheme>.ipa`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa_name: Option<String>,

    /// Export options property list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_options: Option<PathBuf>,
}

impl BuildConfig {
    /// Resolved archive path
    pub fn archive_path(&self, app: &AppConfig) -> PathBuf {
        self.archive_path.clone().unwrap_or_else(|| {
            let stem = if app.name.is_empty() { &self.scheme } else { &app.name };
            PathBuf::from(DEFAULT_EXPORT_PATH).join(format!("{}.xcarchive", stem))
        })
    }

    /// Resolved export directory
    pub fn export_path(&self) -> PathBuf {
        self.export_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH))
    }

    /// Resolved IPA file name
    pub fn ipa_name(&self) -> String {
        self.ipa_name
            .clone()
            .unwrap_or_else(|| format!("{}.ipa", self.scheme))
    }

    /// Resolved export options plist path
    pub fn export_options(&self) -> PathBuf {
        self.export_options
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_OPTIONS))
    }
}

/// Store listing content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Directory holding `name.txt`, `description.txt` and friends
    pub metadata_dir: PathBuf,

    /// Directory holding the PNG screenshots
    pub screenshots_dir: PathBuf,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            metadata_dir: PathBuf::from(DEFAULT_METADATA_DIR),
            screenshots_dir: PathBuf::from(DEFAULT_SCREENSHOTS_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_file_default_uses_key_id() {
        let creds = CredentialsConfig {
            key_id: "ABC123".to_string(),
            ..Default::default()
        };
        assert_eq!(
            creds.key_file_path(),
            PathBuf::from("deployment/AuthKey_ABC123.p8")
        );

        let creds = CredentialsConfig {
            key_file: Some(PathBuf::from("/keys/key.p8")),
            ..creds
        };
        assert_eq!(creds.key_file_path(), PathBuf::from("/keys/key.p8"));
    }

    #[test]
    fn test_build_paths_derive_from_app_and_scheme() {
        let app = AppConfig {
            bundle_id: "com.example.cast".to_string(),
            name: "SlideCast".to_string(),
            ..Default::default()
        };
        let build = BuildConfig {
            scheme: "MemorySlideshow".to_string(),
            ..Default::default()
        };

        assert_eq!(
            build.archive_path(&app),
            PathBuf::from("build/SlideCast.xcarchive")
        );
        assert_eq!(build.export_path(), PathBuf::from("build"));
        assert_eq!(build.ipa_name(), "MemorySlideshow.ipa");
        assert_eq!(
            build.export_options(),
            PathBuf::from("deployment/ExportOptions.plist")
        );
    }

    #[test]
    fn test_sku_defaults_to_name() {
        let app = AppConfig {
            name: "Slide Cast".to_string(),
            ..Default::default()
        };
        assert_eq!(app.sku_or_default(), "slide-cast");
    }
}
