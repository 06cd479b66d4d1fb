//! Error formatting utilities
//!
//! Human-readable and structured renderings of [`Error`] for the CLI and logs.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display
///
/// Adds detail for the structured variants and appends nested causes that the
/// top-level message does not already mention.
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Transport(err) => {
            format!("Request to {} failed ({}): {}", err.url, err.kind, err.message)
        }

        Error::Envelope { method, message } => {
            format!("Core Catalyst rejected {}: {}", method, message)
        }

        Error::Validation {
            field,
            message,
            value,
        } => match value {
            Some(val) => format!(
                "Validation failed for {} (value: '{}'): {}",
                field, val, message
            ),
            None => format!("Validation failed for {}: {}", field, message),
        },

        Error::HttpStatus { status, url } => {
            format!("HTTP {} returned by {}", status, url)
        }

        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
    });

    match error {
        Error::Transport(err) => {
            log_data["transport_kind"] = serde_json::Value::String(err.kind.to_string());
            log_data["url"] = serde_json::Value::String(err.url.clone());
        }
        Error::Envelope { method, .. } | Error::EmptyResult { method } => {
            log_data["api_method"] = serde_json::Value::String(method.clone());
        }
        Error::HttpStatus { status, url } => {
            log_data["http_status"] = serde_json::Value::Number((*status).into());
            log_data["url"] = serde_json::Value::String(url.clone());
        }
        _ => {}
    }

    log_data
}
