//! Concurrent batch dispatch
//!
//! Every descriptor becomes its own task; a semaphore bounds how many are in
//! flight. The call returns once every task is terminal, with one
//! [`RawResult`] per descriptor in input order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::CancellationToken;
use crate::error::{TransportError, TransportErrorKind};
use crate::transport::{RawResponse, RequestDescriptor, Transport};

/// Terminal state of one dispatched request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    /// Position of the descriptor in the dispatched batch
    pub source_index: usize,
    pub outcome: Result<RawResponse, TransportError>,
}

impl RawResult {
    pub fn completed(source_index: usize, response: RawResponse) -> Self {
        Self {
            source_index,
            outcome: Ok(response),
        }
    }

    pub fn failed(source_index: usize, error: TransportError) -> Self {
        Self {
            source_index,
            outcome: Err(error),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn response(&self) -> Option<&RawResponse> {
        self.outcome.as_ref().ok()
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        self.outcome.as_ref().err()
    }
}

/// Fans a batch of requests out over a shared transport
#[derive(Debug)]
pub struct BatchDispatcher<T: ?Sized> {
    transport: Arc<T>,
    max_in_flight: usize,
}

impl<T: ?Sized> Clone for BatchDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            max_in_flight: self.max_in_flight,
        }
    }
}

impl<T> BatchDispatcher<T>
where
    T: Transport + ?Sized + 'static,
{
    /// `max_in_flight` of zero is treated as one
    pub fn new(transport: Arc<T>, max_in_flight: usize) -> Self {
        Self {
            transport,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Run every request to completion
    pub async fn dispatch(&self, descriptors: Vec<RequestDescriptor>) -> Vec<RawResult> {
        self.run(descriptors, None).await
    }

    /// Like [`dispatch`](Self::dispatch), but requests still pending or in
    /// flight when `token` fires end as `Cancelled` failures
    pub async fn dispatch_with_cancel(
        &self,
        descriptors: Vec<RequestDescriptor>,
        token: &CancellationToken,
    ) -> Vec<RawResult> {
        self.run(descriptors, Some(token.clone())).await
    }

    async fn run(
        &self,
        descriptors: Vec<RequestDescriptor>,
        token: Option<CancellationToken>,
    ) -> Vec<RawResult> {
        if descriptors.is_empty() {
            return Vec::new();
        }

        let total = descriptors.len();
        debug!(
            "Dispatching {} requests (max {} in flight)",
            total, self.max_in_flight
        );

        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut urls = Vec::with_capacity(total);
        let mut handles: Vec<JoinHandle<RawResult>> = Vec::with_capacity(total);

        for (source_index, descriptor) in descriptors.into_iter().enumerate() {
            urls.push(descriptor.url().to_string());
            let transport = Arc::clone(&self.transport);
            let permits = Arc::clone(&permits);
            let token = token.clone();

            handles.push(tokio::spawn(async move {
                let outcome =
                    execute_one(transport.as_ref(), &descriptor, &permits, token.as_ref()).await;
                RawResult {
                    source_index,
                    outcome,
                }
            }));
        }

        let mut results = Vec::with_capacity(total);
        for (source_index, (handle, url)) in handles.into_iter().zip(urls).enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    warn!("Request task for {} aborted: {}", url, join_error);
                    RawResult::failed(
                        source_index,
                        TransportError::new(
                            TransportErrorKind::Aborted,
                            url,
                            join_error.to_string(),
                        ),
                    )
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.is_completed()).count();
        debug!("Batch finished: {} completed, {} failed", total - failed, failed);

        results
    }
}

async fn execute_one<T: Transport + ?Sized>(
    transport: &T,
    descriptor: &RequestDescriptor,
    permits: &Semaphore,
    token: Option<&CancellationToken>,
) -> Result<RawResponse, TransportError> {
    let url = descriptor.url().as_str();
    let work = async {
        let _permit = permits.acquire().await.map_err(|e| {
            TransportError::new(TransportErrorKind::Aborted, url, e.to_string())
        })?;
        transport.execute(descriptor).await
    };

    match token {
        None => work.await,
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(TransportError::cancelled(url)),
                outcome = work => outcome,
            }
        }
    }
}
