//! Export options property list

use std::path::Path;

use plist::Value as PlistValue;
use tracing::{debug, info};

use crate::error::Result;

/// Settings written into `ExportOptions.plist`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Distribution method (`app-store`, `ad-hoc`, ...)
    pub method: String,
    /// `automatic` or `manual`
    pub signing_style: String,
    pub team_id: Option<String>,
    pub upload_symbols: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            method: "app-store".to_string(),
            signing_style: "automatic".to_string(),
            team_id: None,
            upload_symbols: true,
        }
    }
}

impl ExportOptions {
    /// App Store export for a team
    pub fn app_store(team_id: Option<String>) -> Self {
        Self {
            team_id,
            ..Default::default()
        }
    }

    fn to_plist(&self) -> PlistValue {
        let mut options = plist::Dictionary::new();
        options.insert("method".to_string(), PlistValue::String(self.method.clone()));
        options.insert(
            "signingStyle".to_string(),
            PlistValue::String(self.signing_style.clone()),
        );
        if let Some(team_id) = &self.team_id {
            options.insert("teamID".to_string(), PlistValue::String(team_id.clone()));
        }
        options.insert("compileBitcode".to_string(), PlistValue::Boolean(false));
        options.insert(
            "uploadSymbols".to_string(),
            PlistValue::Boolean(self.upload_symbols),
        );
        PlistValue::Dictionary(options)
    }
}

/// Write `options` to `path` unless a file is already there.
///
/// Returns `true` if a file was written.
pub fn ensure_export_options(path: &Path, options: &ExportOptions) -> Result<bool> {
    if path.exists() {
        debug!(path = %path.display(), "export options already present");
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    plist::to_writer_xml(file, &options.to_plist())?;
    info!(path = %path.display(), method = %options.method, "wrote export options");
    Ok(true)
}
