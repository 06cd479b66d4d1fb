//! Configuration settings
//!
//! One immutable [`Settings`] value is built per client from defaults, an
//! optional TOML file and environment overrides. Nothing mutates it after the
//! client is constructed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::transport::Timeouts;

// Helper functions for serde defaults
fn default_api_url() -> String {
    "http://teacherstv.ca/api/video/index".to_string()
}

fn default_cdn_base_url() -> String {
    "http://wpc.64a2.edgecastcdn.net".to_string()
}

fn default_screenshot_path() -> String {
    "/0064A2/cds/screens/".to_string()
}

fn default_connect_timeout() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_in_flight() -> usize {
    10
}

fn default_user_agent() -> String {
    crate::utils::version::user_agent()
}

fn default_embed_width() -> u32 {
    480
}

fn default_embed_height() -> f64 {
    320.0
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration settings for the client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// API endpoint and credentials
    #[serde(default)]
    pub api: ApiSettings,
    /// CDN locations for screenshots
    #[serde(default)]
    pub cdn: CdnSettings,
    /// Timeouts and fan-out bound
    #[serde(default)]
    pub network: NetworkSettings,
    /// Default embed rendering options
    #[serde(default)]
    pub embed: EmbedSettings,
    /// Post-upload backup of the source file
    #[serde(default)]
    pub backup: BackupSettings,
    /// Sorting of category and video listings
    #[serde(default)]
    pub listing: ListingSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// API endpoint configuration
///
/// The URL must include the trailing `index` segment; without it the API only
/// answers with a redirect.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Prefix added to uploaded titles and backup file names
    #[serde(default)]
    pub group: Option<String>,
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("group", &self.group)
            .finish()
    }
}

/// CDN configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnSettings {
    #[serde(default = "default_cdn_base_url")]
    pub base_url: String,
    /// Path under the CDN host where `{video_id}.png` screenshots live
    #[serde(default = "default_screenshot_path")]
    pub screenshot_path: String,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Upper bound on simultaneous requests in one batch
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Kind of embed markup to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    /// Flash object
    #[default]
    Flash,
    /// HTML5 `<video>` pointing at the MP4 rendition
    Mobile,
    /// HTML5 video with a flash fallback
    Hybrid,
}

/// Embed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedSettings {
    #[serde(default = "default_embed_width")]
    pub width: u32,
    /// Height may be fractional when derived from an aspect ratio
    #[serde(default = "default_embed_height")]
    pub height: f64,
    #[serde(default)]
    pub kind: EmbedKind,
    #[serde(default = "default_true")]
    pub controls: bool,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub preload: bool,
}

/// Backup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackupSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Mounted directory that receives uploaded source files
    #[serde(default)]
    pub location: Option<PathBuf>,
}

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    /// Ascending numeric id
    #[default]
    Index,
    /// Alphabetical by name or title
    Alpha,
}

/// Listing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListingSettings {
    #[serde(default)]
    pub sort: SortCriteria,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            user: String::new(),
            password: String::new(),
            group: None,
        }
    }
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            base_url: default_cdn_base_url(),
            screenshot_path: default_screenshot_path(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            max_in_flight: default_max_in_flight(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            width: default_embed_width(),
            height: default_embed_height(),
            kind: EmbedKind::default(),
            controls: default_true(),
            autoplay: false,
            preload: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl NetworkSettings {
    /// Timeouts copied into every request descriptor
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout),
            total: Duration::from_secs(self.request_timeout),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> crate::Result<Option<T>>
where
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| crate::Error::config(name, &format!("Invalid value '{}': {}", raw, e))),
        Err(_) => Ok(None),
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(url) = std::env::var("CATALYST_API_URL") {
            self.api.url = url;
        }
        if let Ok(user) = std::env::var("CATALYST_API_USER") {
            self.api.user = user;
        }
        if let Ok(password) = std::env::var("CATALYST_API_PASSWORD") {
            self.api.password = password;
        }
        if let Ok(group) = std::env::var("CATALYST_API_GROUP") {
            self.api.group = Some(group).filter(|g| !g.is_empty());
        }

        if let Some(secs) = env_parse("CATALYST_CONNECT_TIMEOUT")? {
            self.network.connect_timeout = secs;
        }
        if let Some(secs) = env_parse("CATALYST_REQUEST_TIMEOUT")? {
            self.network.request_timeout = secs;
        }
        if let Some(bound) = env_parse("CATALYST_MAX_IN_FLIGHT")? {
            self.network.max_in_flight = bound;
        }

        if let Ok(dir) = std::env::var("CATALYST_BACKUP_DIR") {
            self.backup.enabled = true;
            self.backup.location = Some(PathBuf::from(dir));
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Load settings from environment variables over the defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [("api.url", &self.api.url), ("cdn.base_url", &self.cdn.base_url)] {
            let parsed = url::Url::parse(value).map_err(|e| {
                crate::Error::config(name, &format!("Invalid URL '{}': {}", value, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(crate::Error::config(
                    name,
                    &format!("Unsupported scheme '{}'", parsed.scheme()),
                ));
            }
        }

        if self.network.connect_timeout == 0 || self.network.request_timeout == 0 {
            return Err(crate::Error::config(
                "network",
                "Timeouts cannot be 0",
            ));
        }

        if self.network.max_in_flight == 0 {
            return Err(crate::Error::config(
                "network.max_in_flight",
                "Batch bound cannot be 0",
            ));
        }

        if !(self.embed.height.is_finite() && self.embed.height > 0.0) || self.embed.width == 0 {
            return Err(crate::Error::config(
                "embed",
                "Embed dimensions must be positive",
            ));
        }

        if self.backup.enabled && self.backup.location.is_none() {
            return Err(crate::Error::config(
                "backup.location",
                "Backup is enabled but no location is set",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "logging.level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.url, "http://teacherstv.ca/api/video/index");
        assert_eq!(settings.network.connect_timeout, 120);
        assert_eq!(settings.network.max_in_flight, 10);
        assert_eq!(settings.embed.width, 480);
        assert_eq!(settings.embed.kind, EmbedKind::Flash);
        assert!(settings.embed.controls);
        assert_eq!(settings.listing.sort, SortCriteria::Index);
        assert!(!settings.backup.enabled);
    }

    #[test]
    fn test_timeouts() {
        let mut settings = Settings::new();
        settings.network.connect_timeout = 5;
        settings.network.request_timeout = 30;

        let timeouts = settings.network.timeouts();
        assert_eq!(timeouts.connect, Duration::from_secs(5));
        assert_eq!(timeouts.total, Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[api]
url = "https://video.example.edu/api/video/index"
user = "svc"
password = "s3cret"
group = "ANTH"

[embed]
kind = "hybrid"
height = 270.5

[listing]
sort = "alpha"
        "#
        )
        .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.api.user, "svc");
        assert_eq!(settings.api.group.as_deref(), Some("ANTH"));
        assert_eq!(settings.embed.kind, EmbedKind::Hybrid);
        assert_eq!(settings.embed.height, 270.5);
        assert_eq!(settings.embed.width, 480);
        assert_eq!(settings.listing.sort, SortCriteria::Alpha);
        assert_eq!(settings.network.request_timeout, 120);
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let mut settings = Settings::default();
        settings.api.password = "hunter2".to_string();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_env_var_override() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            std::env::set_var("CATALYST_API_USER", "env-user");
            std::env::set_var("CATALYST_MAX_IN_FLIGHT", "4");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.api.user, "env-user");
        assert_eq!(settings.network.max_in_flight, 4);

        unsafe {
            std::env::remove_var("CATALYST_API_USER");
            std::env::remove_var("CATALYST_MAX_IN_FLIGHT");
        }
    }

    #[test]
    fn test_env_var_invalid_number() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            std::env::set_var("CATALYST_CONNECT_TIMEOUT", "soon");
        }

        let result = Settings::from_env();

        unsafe {
            std::env::remove_var("CATALYST_CONNECT_TIMEOUT");
        }

        assert!(matches!(result, Err(crate::Error::Config { .. })));
    }

    #[test]
    fn test_validation_success() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut settings = Settings::default();
        settings.api.url = "not a url".to_string();
        assert!(settings.validate().is_err());

        settings.api.url = "ftp://video.example.edu/api/video/index".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_zero_bound() {
        let mut settings = Settings::default();
        settings.network.max_in_flight = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_backup_without_location() {
        let mut settings = Settings::default();
        settings.backup.enabled = true;
        assert!(settings.validate().is_err());
    }
}
