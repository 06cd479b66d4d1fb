//! Configuration management for the Core Catalyst client
//!
//! This module handles loading and managing configuration settings
//! for both the library client and the CLI.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    ApiSettings, BackupSettings, CdnSettings, EmbedKind, EmbedSettings, ListingSettings,
    LoggingSettings, NetworkSettings, Settings, SortCriteria,
};

/// Serializes tests that read or write process environment variables
#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
