//! Video upload and source-file backup

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::client::CatalystClientGeneric;
use crate::error::format_error;
use crate::transport::{RequestBody, RequestDescriptor, Transport};
use crate::types::UploadedVideo;
use crate::utils::strip_tags;
use crate::{Error, Result};

/// Description sent when the caller gives none
pub const DEFAULT_DESCRIPTION: &str = "No description supplied.";

/// A file to upload with optional metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UploadRequest {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl<T> CatalystClientGeneric<T>
where
    T: Transport + ?Sized + 'static,
{
    /// `name` prefixed with the configured group, if any
    fn group_prefixed(&self, name: &str) -> String {
        match self.settings().api.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{}_{}", group, name),
            _ => name.to_string(),
        }
    }

    /// Upload a video file
    ///
    /// When backups are enabled the source file is moved afterwards; a failed
    /// backup is recorded on the returned value instead of failing the upload.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadedVideo> {
        let is_file = tokio::fs::metadata(&request.file)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(Error::validation_with_value(
                "file",
                "video file does not exist",
                request.file.display().to_string(),
            ));
        }

        let title = request
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| file_name(&request.file));
        let title = self.group_prefixed(&title);
        let description = request
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let url = self.api_url(&[("method", "upload")])?;
        let descriptor = RequestDescriptor::from_url(
            url,
            crate::transport::Method::Post,
            Some(RequestBody::Multipart {
                fields: vec![
                    ("title".to_string(), strip_tags(&title)),
                    ("description".to_string(), strip_tags(&description)),
                ],
                file_field: "upload".to_string(),
                path: request.file.clone(),
            }),
            self.settings().network.timeouts(),
        )?;

        info!("Uploading {} as \"{}\"", request.file.display(), title);
        let envelope = self.fetch_envelope(&descriptor).await?;

        let uploaded = envelope.result().and_then(UploadedVideo::from_result);
        let mut uploaded = match (uploaded, &envelope.error) {
            (_, Some(message)) => {
                return Err(Error::envelope("upload".to_string(), message.clone()));
            }
            (None, None) => {
                return Err(Error::envelope(
                    "upload",
                    "A problem occurred when attempting to upload the video",
                ));
            }
            (Some(uploaded), None) => uploaded,
        };
        info!("Uploaded {} as video {}", request.file.display(), uploaded.video_id);

        if self.settings().backup.enabled {
            match self.backup_video(&request.file).await {
                Ok(path) => uploaded.backup_path = Some(path),
                Err(e) => {
                    warn!("Video {} uploaded but backup failed: {}", uploaded.video_id, e);
                    uploaded.backup_error = Some(format_error(&e));
                }
            }
        }

        Ok(uploaded)
    }

    /// Move an uploaded source file into the backup location
    pub async fn backup_video(&self, source: &Path) -> Result<PathBuf> {
        let source_is_file = tokio::fs::metadata(source)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !source_is_file {
            return Err(Error::backup(source.display(), "source file does not exist"));
        }

        let location = self
            .settings()
            .backup
            .location
            .as_deref()
            .ok_or_else(|| Error::backup(source.display(), "backup location is not set"))?;

        let metadata = tokio::fs::metadata(location)
            .await
            .map_err(|e| Error::backup(location.display(), format!("location unavailable: {}", e)))?;
        if !metadata.is_dir() {
            return Err(Error::backup(location.display(), "location is not a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(Error::backup(location.display(), "location is not writable"));
        }

        let destination = location.join(self.group_prefixed(&file_name(source)));
        debug!("Moving {} to {}", source.display(), destination.display());

        if let Err(rename_error) = tokio::fs::rename(source, &destination).await {
            debug!("Rename failed ({}), copying instead", rename_error);
            tokio::fs::copy(source, &destination)
                .await
                .map_err(|e| Error::backup(destination.display(), e.to_string()))?;
            tokio::fs::remove_file(source)
                .await
                .map_err(|e| Error::backup(source.display(), format!("copied but not removed: {}", e)))?;
        }

        info!("Backed up {} to {}", source.display(), destination.display());
        Ok(destination)
    }
}
