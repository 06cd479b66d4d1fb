//! Type definitions for Core Catalyst responses
//!
//! Raw envelopes plus the typed records built from them.

pub mod category;
pub mod envelope;
pub mod video;

pub use category::{Category, Listed, VideoSummary, sort_listing};
pub use envelope::{Envelope, ResultNode};
pub use video::{PublishStatus, Toggle, UploadedVideo, VideoDetails, VideoStatus, VideoUpdate};
