//! Error types for the Core Catalyst client
//!
//! The crate-wide [`Error`] plus the two per-request failure types that the
//! batch machinery records without raising: [`TransportError`] and
//! [`ParseError`].

use std::fmt;

use thiserror::Error;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not a usable envelope
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The API answered with an application-level error inside the envelope
    #[error("API error from {method}: {message}")]
    Envelope {
        /// API method that reported the error
        method: String,
        /// Error text carried by the envelope
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The server returned something that is neither XML nor an image
    #[error("Unexpected content type '{content_type}' from {url}")]
    UnexpectedContent {
        /// Content type header value
        content_type: String,
        /// Requested URL
        url: String,
    },

    /// The API answered successfully but returned nothing
    #[error("No results returned by {method}")]
    EmptyResult {
        /// API method that returned an empty result
        method: String,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Caller input rejected before any request was made
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Error message describing the validation failure
        message: String,
        /// The invalid value that caused the validation to fail
        value: Option<String>,
    },

    /// Backup of an uploaded file failed
    #[error("Backup of {path} failed: {message}")]
    Backup {
        /// Source or destination path involved
        path: String,
        /// What went wrong
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an envelope error
    pub fn envelope<S: Into<String>>(method: S, message: S) -> Self {
        Self::Envelope {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create an empty result error
    pub fn empty_result(method: impl Into<String>) -> Self {
        Self::EmptyResult {
            method: method.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Create a validation error carrying the rejected value
    pub fn validation_with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a backup error
    pub fn backup(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::Backup {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Transport(..) => "transport",
            Error::Parse(..) => "parse",
            Error::Envelope { .. } => "envelope",
            Error::HttpStatus { .. } => "http_status",
            Error::UnexpectedContent { .. } => "unexpected_content",
            Error::EmptyResult { .. } => "empty_result",
            Error::Config { .. } => "config",
            Error::Validation { .. } => "validation",
            Error::Backup { .. } => "backup",
            Error::Internal { .. } => "internal",
        }
    }
}

/// Why a request never produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, TLS failure
    Connect,
    /// Connect or total timeout elapsed
    Timeout,
    /// Request could not be built or sent
    Request,
    /// Response body could not be read
    Body,
    /// Reading a local file for the request body failed
    Io,
    /// The batch was cancelled before the request finished
    Cancelled,
    /// The task running the request died
    Aborted,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
            Self::Io => "io",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one outbound request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Transport failure ({kind}) for {url}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Cancelled, url, "batch cancelled")
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(url: impl Into<String>, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, url, err.to_string())
    }
}

/// A response body that could not be turned into an envelope
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Not well-formed XML
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// A structural node the caller relies on is absent
    #[error("Missing '{node}' node in response")]
    MissingNode {
        /// Name of the absent node
        node: String,
    },

    /// A field is present but cannot be interpreted
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField {
        /// Field name
        field: String,
        /// Raw text found
        value: String,
    },
}

impl ParseError {
    pub fn missing(node: impl Into<String>) -> Self {
        Self::MissingNode { node: node.into() }
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
