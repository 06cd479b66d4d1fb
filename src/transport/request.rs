//! Request descriptors and raw responses
//!
//! A [`RequestDescriptor`] is fully formed by the caller (query string already
//! built) and validated when constructed, so a malformed URL never reaches the
//! network.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Connect and total timeouts applied to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub total: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(120),
            total: Duration::from_secs(120),
        }
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Raw bytes sent as-is
    Bytes(Vec<u8>),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with text fields and one streamed file
    Multipart {
        fields: Vec<(String, String)>,
        file_field: String,
        path: PathBuf,
    },
}

/// One outbound request, immutable once built
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    url: Url,
    method: Method,
    body: Option<RequestBody>,
    timeouts: Timeouts,
}

impl RequestDescriptor {
    /// GET request for an absolute http(s) URL
    pub fn get(url: &str, timeouts: Timeouts) -> Result<Self> {
        Self::from_url(parse_request_url(url)?, Method::Get, None, timeouts)
    }

    /// POST request for an absolute http(s) URL
    pub fn post(url: &str, body: RequestBody, timeouts: Timeouts) -> Result<Self> {
        Self::from_url(parse_request_url(url)?, Method::Post, Some(body), timeouts)
    }

    /// Build from an already parsed URL
    pub fn from_url(
        url: Url,
        method: Method,
        body: Option<RequestBody>,
        timeouts: Timeouts,
    ) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::validation_with_value(
                "url",
                "only http and https URLs can be requested",
                url.as_str(),
            ));
        }
        if method == Method::Get && body.is_some() {
            return Err(Error::validation_with_value(
                "body",
                "GET requests cannot carry a body",
                url.as_str(),
            ));
        }
        Ok(Self {
            url,
            method,
            body,
            timeouts,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }
}

fn parse_request_url(url: &str) -> Result<Url> {
    Url::parse(url)
        .map_err(|e| Error::validation_with_value("url", format!("malformed URL: {}", e), url))
}

/// A response that reached the client, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Media type without parameters, lowercased
    pub fn media_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn is_xml(&self) -> bool {
        matches!(self.media_type().as_str(), "text/xml" | "application/xml")
    }

    pub fn is_png(&self) -> bool {
        self.media_type() == "image/png"
    }

    /// Body as text, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
