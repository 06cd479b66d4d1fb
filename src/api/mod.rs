//! Core Catalyst API operations
//!
//! Everything hangs off [`CatalystClientGeneric`]; the submodules split its
//! operations by concern.

pub mod categories;
pub mod client;
pub mod embed;
pub mod upload;
pub mod videos;

pub use client::{BatchOptions, CatalystClient, CatalystClientGeneric};
pub use embed::{EmbedOptions, flash_url, mp4_url, render_embed};
pub use upload::{DEFAULT_DESCRIPTION, UploadRequest};
