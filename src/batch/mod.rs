//! Batch execution
//!
//! [`BatchDispatcher`] runs many independent requests concurrently and
//! [`merge`] turns their raw results into a map keyed by the id each payload
//! carries.

pub mod cancel;
pub mod dispatcher;
pub mod merge;

pub use cancel::CancellationToken;
pub use dispatcher::{BatchDispatcher, RawResult};
pub use merge::{Diagnostics, Disposition, MergeReport, Payload, ResultMap, merge, merge_with_report};
