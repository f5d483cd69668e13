//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::{config_file_names, DEPLOYMENT_DIR};
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = read_config(path)?;
    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Parse a configuration file without validating it
pub fn read_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`             (e.g. `liftoff.toml`)
///   2. `<dir>/deployment/<name>`  (e.g. `deployment/liftoff.toml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let nested = current.join(DEPLOYMENT_DIR).join(name);
            if nested.exists() {
                info!(path = %nested.display(), "found config file in deployment/");
                return Some(nested);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration or use defaults.
///
/// A missing file yields defaults. A file that exists but fails to parse is
/// still an error, so typos are not silently ignored. Validation is left to
/// the caller because command-line overrides may fill in missing fields.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = read_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            warn!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL_TOML: &str = r#"
[credentials]
key_id = "KEY123"
issuer_id = "issuer-uuid"

[app]
bundle_id = "com.example.cast"
name = "SlideCast"

[build]
scheme = "MemorySlideshow"
"#;

    #[test]
    fn test_find_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("liftoff.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_toml_over_yaml() {
        let temp = TempDir::new().unwrap();
        let toml_path = temp.path().join("liftoff.toml");
        let yaml_path = temp.path().join("liftoff.yaml");
        std::fs::write(&toml_path, MINIMAL_TOML).unwrap();
        std::fs::write(&yaml_path, "app:\n  bundle_id: com.example.other\n").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, toml_path);
    }

    #[test]
    fn test_find_config_in_deployment_dir() {
        let temp = TempDir::new().unwrap();
        let nested_dir = temp.path().join("deployment");
        std::fs::create_dir_all(&nested_dir).unwrap();
        let config_path = nested_dir.join("liftoff.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_walks_parents() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("liftoff.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();
        let child = temp.path().join("ios").join("App");
        std::fs::create_dir_all(&child).unwrap();

        assert_eq!(find_config(&child), Some(config_path));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("liftoff.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.credentials.key_id, "KEY123");
        assert_eq!(config.app.bundle_id, "com.example.cast");
        assert_eq!(config.build.scheme, "MemorySlideshow");
        assert_eq!(
            config.api.base_url,
            "https://api.appstoreconnect.apple.com/v1"
        );
        assert_eq!(
            config.listing.screenshots_dir,
            PathBuf::from("deployment/screenshots/en-US")
        );
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("liftoff.yaml");
        std::fs::write(
            &config_path,
            "credentials:\n  key_id: KEY123\n  issuer_id: issuer\napp:\n  bundle_id: com.example.cast\n  name: SlideCast\nbuild:\n  scheme: MemorySlideshow\nlisting:\n  metadata_dir: meta\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.app.name, "SlideCast");
        assert_eq!(config.listing.metadata_dir, PathBuf::from("meta"));
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("liftoff.toml");
        std::fs::write(&config_path, "[app]\nbundle_id = \"\"\n").unwrap();

        assert!(load_config(&config_path).is_err());
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path()).unwrap();
        assert!(path.is_none());
        assert!(config.app.bundle_id.is_empty());
    }

    #[test]
    fn test_load_config_or_default_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("liftoff.toml"), "[app\nbroken").unwrap();

        assert!(load_config_or_default(temp.path()).is_err());
    }
}
