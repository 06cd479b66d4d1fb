//! Version information utilities

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the current application version
pub fn get_version() -> &'static str {
    VERSION
}

/// User-Agent header sent with every request
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), VERSION)
}
