//! Outbound HTTP transport
//!
//! [`Transport`] is the seam between the client and the network: it turns a
//! [`RequestDescriptor`] into either a [`RawResponse`] or a
//! [`TransportError`](crate::error::TransportError). Tests substitute their
//! own implementations.

pub mod http;
pub mod request;

pub use http::{Credentials, HttpTransport};
pub use request::{Method, RawResponse, RequestBody, RequestDescriptor, Timeouts};

use crate::error::TransportError;

/// Executes one request to a terminal state
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the whole body. Never retries.
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;
}
