//! Core Catalyst - Rust client for the Core Catalyst video API
//!
//! Talks to the Core Catalyst (TeachersTV) video hosting API over HTTP with
//! basic authentication and XML responses.
//!
//! # Features
//!
//! - **Batch lookups**: many `getStatus` calls run concurrently with a bounded
//!   number in flight, then merged by the video id each response carries
//! - **Typed responses**: XML envelopes parsed into explicit structures
//! - **Video management**: update, delete, upload with optional backup of the
//!   source file, category assignment
//! - **Embed markup**: flash, mobile and hybrid players
//!
//! # Architecture
//!
//! - [`transport`]: the HTTP seam, one request in and one raw response out
//! - [`batch`]: concurrent dispatch and response keying
//! - [`types`]: envelope parsing and the records built from it
//! - [`api`]: the client and its operations
//!
//! # Examples
//!
//! ```rust,no_run
//! use core_catalyst::{CatalystClient, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CatalystClient::new(Settings::from_env()?)?;
//! let videos = client.get_info_multi(&["762", "763", "764"]).await?;
//! for (id, video) in &videos {
//!     println!("{}: {:?}", id, video.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;
pub mod utils;

pub use api::{CatalystClient, CatalystClientGeneric};
pub use batch::{BatchDispatcher, CancellationToken, Diagnostics, RawResult};
pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use transport::{HttpTransport, RequestDescriptor, Transport};
pub use types::{Category, Envelope, VideoDetails, VideoStatus};
