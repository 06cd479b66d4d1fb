//! Keying raw batch results by the id found inside each payload
//!
//! The dispatch index only says where a request sat in the batch; the map key
//! always comes from the payload itself, so an entry can never be filed under
//! the wrong id.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::RawResult;
use crate::error::{ParseError, TransportErrorKind};

/// Parsed body that may carry an API-level error
pub trait Payload {
    /// Non-empty embedded error message
    fn embedded_error(&self) -> Option<&str>;
}

/// Key to payload
pub type ResultMap<P> = HashMap<String, P>;

/// What happened to one raw result during a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Merged { key: String },
    DroppedAsParseError(ParseError),
    DroppedAsEnvelopeError(String),
    DroppedAsUnkeyed,
    TransportFailed(TransportErrorKind),
}

impl Disposition {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// How loudly to report dropped entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Diagnostics {
    /// Drops are warnings
    #[default]
    Report,
    /// Parse and envelope errors are expected for this batch; log at debug
    SuppressExpected,
}

/// Merge output with a disposition per raw result
#[derive(Debug, Clone)]
pub struct MergeReport<P> {
    pub entries: ResultMap<P>,
    /// `(source_index, disposition)` in ascending index order
    pub dispositions: Vec<(usize, Disposition)>,
}

impl<P> MergeReport<P> {
    /// Indexes whose result did not end up in the map
    pub fn dropped(&self) -> impl Iterator<Item = (usize, &Disposition)> {
        self.dispositions
            .iter()
            .filter(|(_, d)| !d.is_merged())
            .map(|(i, d)| (*i, d))
    }
}

/// Build a key to payload map, dropping anything that failed
pub fn merge<P, F, K>(results: &[RawResult], parse: F, extract_key: K) -> ResultMap<P>
where
    P: Payload,
    F: Fn(&[u8]) -> Result<P, ParseError>,
    K: Fn(&P) -> Option<String>,
{
    merge_with_report(results, parse, extract_key, Diagnostics::Report).entries
}

/// [`merge`] that also reports what happened to each result
pub fn merge_with_report<P, F, K>(
    results: &[RawResult],
    parse: F,
    extract_key: K,
    diagnostics: Diagnostics,
) -> MergeReport<P>
where
    P: Payload,
    F: Fn(&[u8]) -> Result<P, ParseError>,
    K: Fn(&P) -> Option<String>,
{
    let mut ordered: Vec<&RawResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.source_index);

    let mut entries = HashMap::with_capacity(ordered.len());
    let mut dispositions = Vec::with_capacity(ordered.len());

    for raw in ordered {
        let index = raw.source_index;
        let disposition = match &raw.outcome {
            Err(error) => {
                warn!("Request {} failed: {}", index, error);
                Disposition::TransportFailed(error.kind)
            }
            Ok(response) => match parse(&response.body) {
                Err(error) => {
                    report(diagnostics, index, "unparseable response", &error);
                    Disposition::DroppedAsParseError(error)
                }
                Ok(payload) => {
                    if let Some(message) = payload.embedded_error() {
                        report(diagnostics, index, "API error", &message);
                        Disposition::DroppedAsEnvelopeError(message.to_string())
                    } else {
                        match extract_key(&payload).filter(|k| !k.is_empty()) {
                            None => {
                                debug!("Dropping request {}: no key in payload", index);
                                Disposition::DroppedAsUnkeyed
                            }
                            Some(key) => {
                                if entries.insert(key.clone(), payload).is_some() {
                                    debug!("Request {} replaces earlier entry for {}", index, key);
                                }
                                Disposition::Merged { key }
                            }
                        }
                    }
                }
            },
        };
        dispositions.push((index, disposition));
    }

    MergeReport {
        entries,
        dispositions,
    }
}

fn report(diagnostics: Diagnostics, index: usize, what: &str, detail: &dyn fmt::Display) {
    match diagnostics {
        Diagnostics::Report => warn!("Dropping request {} ({}): {}", index, what, detail),
        Diagnostics::SuppressExpected => {
            debug!("Dropping request {} ({}): {}", index, what, detail)
        }
    }
}
