//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "liftoff.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "liftoff.yaml";

/// Subdirectory searched alongside each directory level
pub const DEPLOYMENT_DIR: &str = "deployment";

/// App Store Connect REST API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Directory holding the API private key
pub const DEFAULT_KEY_DIR: &str = "deployment";

/// Build output directory
pub const DEFAULT_EXPORT_PATH: &str = "build";

/// Export options property list
pub const DEFAULT_EXPORT_OPTIONS: &str = "deployment/ExportOptions.plist";

/// Text metadata directory
pub const DEFAULT_METADATA_DIR: &str = "deployment/metadata/en-US";

/// Screenshot directory
pub const DEFAULT_SCREENSHOTS_DIR: &str = "deployment/screenshots/en-US";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".liftoff.toml",
        ".liftoff.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# liftoff configuration

[credentials]
key_id = "XXXXXXXXXX"
issuer_id = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
# key_file = "deployment/AuthKey_XXXXXXXXXX.p8"

[app]
bundle_id = "com.example.app"
name = "Example"
# sku = "example"

[build]
scheme = "Example"
# archive_path = "build/Example.xcarchive"
# export_path = "build"
# ipa_name = "Example.ipa"
# export_options = "deployment/ExportOptions.plist"

[listing]
metadata_dir = "deployment/metadata/en-US"
screenshots_dir = "deployment/screenshots/en-US"
"#;
