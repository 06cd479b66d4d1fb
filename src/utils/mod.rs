//! Utility functions and helpers

pub mod markup;
pub mod version;

pub use markup::{ALLOWED_TAGS, strip_tags};
pub use version::{VERSION, get_version, user_agent};
