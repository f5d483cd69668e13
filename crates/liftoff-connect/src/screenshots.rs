//! Screenshot upload
//!
//! Screenshots are grouped into device classes by file name prefix. Each
//! class maps to one screenshot set on the version localization, whose
//! contents are replaced wholesale. A single screenshot goes up in three
//! steps: reserve a slot, send the byte ranges the reservation asks for to
//! their pre-signed URLs, then commit with the file's MD5 checksum.
//!
//! Existing screenshots are deleted before the new ones are uploaded, so a
//! run that fails partway leaves the set incomplete until the next run.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, error, info, warn};

use crate::client::ConnectClient;
use crate::error::{ApiOutcome, Result};
use crate::types::{
    Ignored, ListDocument, LocalizationAttributes, ScreenshotAttributes, ScreenshotSetAttributes,
    SingleDocument,
};

/// Device class a screenshot is shown for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayClass {
    /// 6.7" iPhone
    Iphone67,
    /// 6.5" iPhone
    Iphone65,
    /// 6.1" iPhone
    Iphone61,
    /// 12.9" iPad Pro
    Ipad,
}

impl DisplayClass {
    /// All classes in upload order
    pub const ALL: [DisplayClass; 4] = [
        DisplayClass::Iphone67,
        DisplayClass::Iphone65,
        DisplayClass::Iphone61,
        DisplayClass::Ipad,
    ];

    /// File name prefix selecting this class
    pub fn prefix(&self) -> &'static str {
        match self {
            DisplayClass::Iphone67 => "1_iphone67",
            DisplayClass::Iphone65 => "1b_iphone65",
            DisplayClass::Iphone61 => "2_iphone61",
            DisplayClass::Ipad => "3_ipad",
        }
    }

    /// Display type name on the API
    pub fn display_type(&self) -> &'static str {
        match self {
            DisplayClass::Iphone67 => "APP_IPHONE_67",
            DisplayClass::Iphone65 => "APP_IPHONE_65",
            DisplayClass::Iphone61 => "APP_IPHONE_61",
            DisplayClass::Ipad => "APP_IPAD_PRO_3GEN_129",
        }
    }

    /// Short bucket name
    pub fn name(&self) -> &'static str {
        match self {
            DisplayClass::Iphone67 => "iphone67",
            DisplayClass::Iphone65 => "iphone65",
            DisplayClass::Iphone61 => "iphone61",
            DisplayClass::Ipad => "ipad",
        }
    }

    /// Class for a file name, `None` if no prefix matches
    pub fn classify(file_name: &str) -> Option<DisplayClass> {
        Self::ALL
            .into_iter()
            .find(|class| file_name.starts_with(class.prefix()))
    }
}

impl std::fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Screenshots of one device class, in file name order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotGroup {
    pub class: DisplayClass,
    pub files: Vec<PathBuf>,
}

/// Group the PNG files in `dir` by device class.
///
/// Groups come back in upload order and only when non-empty. Files matching
/// no prefix are skipped.
pub fn group_screenshots(dir: &Path) -> Result<Vec<ScreenshotGroup>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    files.sort();

    let mut groups: Vec<ScreenshotGroup> = DisplayClass::ALL
        .into_iter()
        .map(|class| ScreenshotGroup {
            class,
            files: Vec::new(),
        })
        .collect();

    for path in files {
        let name = file_name(&path);
        match DisplayClass::classify(&name) {
            Some(class) => {
                if let Some(group) = groups.iter_mut().find(|g| g.class == class) {
                    group.files.push(path);
                }
            }
            None => debug!(file = %name, "no device class prefix, skipping"),
        }
    }

    groups.retain(|g| !g.files.is_empty());
    Ok(groups)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Size in bytes and MD5 hex digest of a file
pub async fn file_info(path: &Path) -> Result<(u64, String)> {
    let bytes = tokio::fs::read(path).await?;
    let digest = md5::compute(&bytes);
    Ok((bytes.len() as u64, format!("{:x}", digest)))
}

/// Upload every grouped screenshot in `dir` to the version's first localization
pub async fn upload_screenshots(
    client: &ConnectClient,
    version_id: &str,
    dir: &Path,
) -> Result<bool> {
    info!(dir = %dir.display(), "uploading screenshots");

    if !dir.is_dir() {
        error!(dir = %dir.display(), "screenshots directory not found");
        return Ok(false);
    }

    let endpoint = format!("appStoreVersions/{}/appStoreVersionLocalizations", version_id);
    let localization = match client
        .get::<ListDocument<LocalizationAttributes>>(&endpoint)
        .await
        .api_outcome()?
    {
        Ok(list) => list.into_first(),
        Err(failure) => {
            warn!("localization lookup failed: {}", failure);
            None
        }
    };
    let Some(localization) = localization else {
        error!("no localizations found for version");
        return Ok(false);
    };
    info!(
        localization_id = %localization.id,
        locale = localization.attributes.locale.as_deref().unwrap_or("?"),
        "using localization"
    );

    let mut success = true;
    for group in group_screenshots(dir)? {
        info!(class = %group.class, count = group.files.len(), "processing screenshots");

        let Some(set_id) =
            get_or_create_screenshot_set(client, &localization.id, group.class.display_type())
                .await?
        else {
            error!(class = %group.class, "no screenshot set");
            success = false;
            continue;
        };

        let total = group.files.len();
        for (index, path) in group.files.iter().enumerate() {
            let name = file_name(path);
            info!("uploading {} ({}/{})", name, index + 1, total);
            if upload_screenshot(client, &set_id, path).await? {
                info!("uploaded {}", name);
            } else {
                error!("failed to upload {}", name);
                success = false;
            }
        }
    }

    if success {
        info!("all screenshots uploaded");
    } else {
        warn!("some screenshots failed to upload");
    }
    Ok(success)
}

/// Find the set for `display_type` and empty it, or create it
pub async fn get_or_create_screenshot_set(
    client: &ConnectClient,
    localization_id: &str,
    display_type: &str,
) -> Result<Option<String>> {
    let endpoint = format!(
        "appStoreVersionLocalizations/{}/appScreenshotSets",
        localization_id
    );
    let sets: ListDocument<ScreenshotSetAttributes> =
        match client.get(&endpoint).await.api_outcome()? {
            Ok(sets) => sets,
            Err(failure) => {
                warn!("screenshot set lookup failed: {}", failure);
                ListDocument { data: Vec::new() }
            }
        };

    let existing = sets
        .data
        .into_iter()
        .find(|set| set.attributes.screenshot_display_type.as_deref() == Some(display_type));

    if let Some(set) = existing {
        info!(set_id = %set.id, "found existing screenshot set");
        clear_screenshot_set(client, &set.id).await?;
        return Ok(Some(set.id));
    }

    info!(display_type, "creating screenshot set");
    let body = json!({
        "data": {
            "type": "appScreenshotSets",
            "attributes": { "screenshotDisplayType": display_type },
            "relationships": {
                "appStoreVersionLocalization": {
                    "data": { "type": "appStoreVersionLocalizations", "id": localization_id }
                }
            }
        }
    });

    match client
        .post::<SingleDocument<Ignored>>("appScreenshotSets", &body)
        .await
        .api_outcome()?
    {
        Ok(created) => {
            info!(set_id = %created.data.id, "created screenshot set");
            Ok(Some(created.data.id))
        }
        Err(failure) => {
            error!("failed to create screenshot set: {}", failure);
            Ok(None)
        }
    }
}

async fn clear_screenshot_set(client: &ConnectClient, set_id: &str) -> Result<()> {
    let endpoint = format!("appScreenshotSets/{}/appScreenshots", set_id);
    let screenshots: ListDocument<Ignored> = match client.get(&endpoint).await.api_outcome()? {
        Ok(list) => list,
        Err(failure) => {
            warn!("screenshot listing failed: {}", failure);
            return Ok(());
        }
    };

    if screenshots.data.is_empty() {
        return Ok(());
    }

    info!(count = screenshots.data.len(), "deleting existing screenshots");
    for screenshot in screenshots.data {
        if !client
            .delete(&format!("appScreenshots/{}", screenshot.id))
            .await?
        {
            warn!(screenshot_id = %screenshot.id, "delete was not applied");
        }
    }
    Ok(())
}

/// Reserve, upload and commit one screenshot into a set
pub async fn upload_screenshot(client: &ConnectClient, set_id: &str, path: &Path) -> Result<bool> {
    let (file_size, checksum) = file_info(path).await?;
    let name = file_name(path);

    let reserve = json!({
        "data": {
            "type": "appScreenshots",
            "attributes": {
                "fileName": name,
                "fileSize": file_size
            },
            "relationships": {
                "appScreenshotSet": {
                    "data": { "type": "appScreenshotSets", "id": set_id }
                }
            }
        }
    });

    let reservation = match client
        .post::<SingleDocument<ScreenshotAttributes>>("appScreenshots", &reserve)
        .await
        .api_outcome()?
    {
        Ok(doc) => doc.data,
        Err(failure) => {
            error!("failed to reserve screenshot slot: {}", failure);
            return Ok(false);
        }
    };
    debug!(
        screenshot_id = %reservation.id,
        parts = reservation.attributes.upload_operations.len(),
        "screenshot reserved"
    );

    let mut file = tokio::fs::File::open(path).await?;
    for operation in &reservation.attributes.upload_operations {
        let available = file_size.saturating_sub(operation.offset);
        if operation.length > available {
            error!(
                offset = operation.offset,
                length = operation.length,
                file_size,
                "upload part lies outside the file"
            );
            return Ok(false);
        }

        file.seek(SeekFrom::Start(operation.offset)).await?;
        let mut chunk = Vec::with_capacity(operation.length as usize);
        (&mut file).take(operation.length).read_to_end(&mut chunk).await?;
        if chunk.len() as u64 != operation.length {
            error!(
                offset = operation.offset,
                read = chunk.len(),
                "short read for screenshot part"
            );
            return Ok(false);
        }

        let status = client
            .upload_part(&operation.url, &operation.request_headers, chunk)
            .await?;
        if !matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
        ) {
            error!(
                offset = operation.offset,
                status = status.as_u16(),
                "failed to upload screenshot part"
            );
            return Ok(false);
        }
    }

    let commit = json!({
        "data": {
            "type": "appScreenshots",
            "id": reservation.id,
            "attributes": {
                "sourceFileChecksum": checksum,
                "uploaded": true
            }
        }
    });

    match client
        .patch::<SingleDocument<Ignored>>(&format!("appScreenshots/{}", reservation.id), &commit)
        .await
        .api_outcome()?
    {
        Ok(_) => Ok(true),
        Err(failure) => {
            error!("failed to commit screenshot: {}", failure);
            Ok(false)
        }
    }
}
