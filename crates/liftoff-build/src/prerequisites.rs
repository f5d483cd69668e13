//! Toolchain availability

use std::path::PathBuf;

use tracing::debug;

/// Whether a required tool is on `PATH`
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<PathBuf>,
    pub install_hint: String,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

/// Tools the build steps shell out to, with install hints
const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("xcodebuild", "Install Xcode from the App Store"),
    ("xcrun", "Install Xcode Command Line Tools: xcode-select --install"),
];

/// Look up `xcodebuild` and `xcrun`
pub fn check_prerequisites() -> Vec<ToolStatus> {
    REQUIRED_TOOLS
        .iter()
        .map(|(name, hint)| {
            let path = which::which(name).ok();
            debug!(tool = *name, found = path.is_some(), "checked tool");
            ToolStatus {
                name: name.to_string(),
                path,
                install_hint: hint.to_string(),
            }
        })
        .collect()
}
