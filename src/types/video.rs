//! Video records returned by the API

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::ResultNode;

/// Transcoding pipeline state reported in `video_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoStatus {
    Deleted,
    New,
    DownloadingToTranscoder,
    DownloadedToTranscoder,
    Encoding,
    UploadingToCdn,
    Ready,
    Failed,
    /// Code this client does not know about
    Unknown(i32),
}

impl VideoStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Deleted,
            0 => Self::New,
            1 => Self::DownloadingToTranscoder,
            2 => Self::DownloadedToTranscoder,
            3 => Self::Encoding,
            4 => Self::UploadingToCdn,
            5 => Self::Ready,
            9 => Self::Failed,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Deleted => -1,
            Self::New => 0,
            Self::DownloadingToTranscoder => 1,
            Self::DownloadedToTranscoder => 2,
            Self::Encoding => 3,
            Self::UploadingToCdn => 4,
            Self::Ready => 5,
            Self::Failed => 9,
            Self::Unknown(code) => *code,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Deleted => "Deleted",
            Self::New => "New",
            Self::DownloadingToTranscoder => "Downloading to transcoding system",
            Self::DownloadedToTranscoder => "Downloaded to transcoding system",
            Self::Encoding => "Encoding video file",
            Self::UploadingToCdn => "Uploading to Content Distribution Network",
            Self::Ready => "Encoding Complete and ready for embedding",
            Self::Failed => "Error during transcoding or uploading process",
            Self::Unknown(_) => "Unknown status",
        }
    }

    /// Whether the video can be embedded
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

impl Serialize for VideoStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// Publication state reported in `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStatus {
    Deleted,
    Available,
    Submitted,
    Unknown(i32),
}

impl PublishStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Deleted,
            1 => Self::Available,
            2 => Self::Submitted,
            other => Self::Unknown(other),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Deleted => "Deleted",
            Self::Available => "Available",
            Self::Submitted => "Submitted",
            Self::Unknown(_) => "Unknown status",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Flat view of a `getStatus` result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoDetails {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub published_date: Option<String>,
    pub status: Option<String>,
    pub video_status: Option<String>,
    pub download: Option<String>,
    pub embed: Option<String>,
    pub description: Option<String>,
    pub access_key: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_username: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub asset_type: Option<String>,
    /// CDN screenshot URL, set only when the image exists
    pub screenshot: Option<String>,
}

impl VideoDetails {
    pub fn from_result(result: &ResultNode) -> Self {
        Self {
            video_id: result.field_owned("video_id"),
            title: result.field_owned("title"),
            video_url: result.field_owned("video_url"),
            published_date: result.field_owned("published_date"),
            status: result.field_owned("status"),
            video_status: result.field_owned("video_status"),
            download: result.field_owned("download"),
            embed: result.field_owned("embed"),
            description: result.field_owned("description"),
            access_key: result.field_owned("access_key"),
            uploaded_by: result.field_owned("uploaded_by"),
            uploaded_by_username: result.field_owned("uploaded_by_username"),
            created: result.field_owned("created"),
            modified: result.field_owned("modified"),
            asset_type: result.field_owned("asset_type"),
            screenshot: None,
        }
    }

    /// Decoded `video_status`, if numeric
    pub fn video_status_code(&self) -> Option<VideoStatus> {
        self.video_status
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .map(VideoStatus::from_code)
    }

    /// Decoded `status`, if numeric
    pub fn publish_status(&self) -> Option<PublishStatus> {
        self.status
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .map(PublishStatus::from_code)
    }
}

/// Three-way switch used by `update` for publish, embed and download flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Toggle {
    Off,
    On,
    /// Defer to the site setting
    SiteDefault,
}

impl Toggle {
    pub fn as_param(&self) -> &'static str {
        match self {
            Toggle::Off => "0",
            Toggle::On => "1",
            Toggle::SiteDefault => "2",
        }
    }
}

/// Changes sent with an `update` call; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<Toggle>,
    pub embed: Option<Toggle>,
    pub download: Option<Toggle>,
}

impl VideoUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published(mut self, published: Toggle) -> Self {
        self.published = Some(published);
        self
    }

    pub fn with_embed(mut self, embed: Toggle) -> Self {
        self.embed = Some(embed);
        self
    }

    pub fn with_download(mut self, download: Toggle) -> Self {
        self.download = Some(download);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadedVideo {
    pub video_id: String,
    pub access_key: Option<String>,
    pub created: Option<String>,
    pub published_date: Option<String>,
    pub status: Option<String>,
    pub published: Option<String>,
    pub embed: Option<String>,
    pub download: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_username: Option<String>,
    /// Where the source file was moved, when backup ran
    pub backup_path: Option<PathBuf>,
    /// Why the backup failed, when it did
    pub backup_error: Option<String>,
}

impl UploadedVideo {
    /// Build from an upload result; `None` without a `video_id`
    pub fn from_result(result: &ResultNode) -> Option<Self> {
        Some(Self {
            video_id: result.field_owned("video_id")?,
            access_key: result.field_owned("access_key"),
            created: result.field_owned("created"),
            published_date: result.field_owned("published_date"),
            status: result.field_owned("status"),
            published: result.field_owned("published"),
            embed: result.field_owned("embed"),
            download: result.field_owned("download"),
            description: result.field_owned("description"),
            uploaded_by: result.field_owned("uploaded_by"),
            uploaded_by_username: result.field_owned("uploaded_by_username"),
            backup_path: None,
            backup_error: None,
        })
    }
}
