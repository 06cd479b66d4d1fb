//! # Core Catalyst client
//!
//! [`CatalystClientGeneric`] owns the immutable [`Settings`], the transport and
//! a [`BatchDispatcher`] sharing that transport. Single calls go straight to
//! the transport; multi-video operations fan out through the dispatcher.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use core_catalyst::api::CatalystClient;
//! use core_catalyst::config::Settings;
//!
//! # tokio_test::block_on(async {
//! let client = CatalystClient::new(Settings::from_env()?)?;
//! let details = client.get_info("762").await?;
//! println!("{:?}", details.title);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::batch::{BatchDispatcher, CancellationToken, Diagnostics, RawResult};
use crate::config::Settings;
use crate::transport::{HttpTransport, RawResponse, RequestDescriptor, Transport};
use crate::types::Envelope;
use crate::{Error, Result};

/// Client using the reqwest transport
pub type CatalystClient = CatalystClientGeneric<HttpTransport>;

/// Core Catalyst API client, generic over its transport
#[derive(Debug)]
pub struct CatalystClientGeneric<T: Transport + ?Sized = HttpTransport> {
    settings: Arc<Settings>,
    transport: Arc<T>,
    dispatcher: BatchDispatcher<T>,
}

/// Knobs for batch operations
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub diagnostics: Diagnostics,
    pub cancel: Option<CancellationToken>,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// A response classified by content type
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiResponse {
    Envelope(Envelope),
    Image { exists: bool },
}

impl ApiResponse {
    pub(crate) fn classify(response: &RawResponse, url: &str) -> Result<Self> {
        if response.is_xml() {
            Ok(Self::Envelope(Envelope::parse(&response.body)?))
        } else if response.is_png() {
            Ok(Self::Image {
                exists: response.status == 200,
            })
        } else if !response.is_success() {
            Err(Error::HttpStatus {
                status: response.status,
                url: url.to_string(),
            })
        } else {
            Err(Error::UnexpectedContent {
                content_type: response.content_type.clone(),
                url: url.to_string(),
            })
        }
    }
}

impl CatalystClientGeneric<HttpTransport> {
    /// Create a client talking HTTP with the given settings
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = HttpTransport::from_settings(&settings);
        Self::with_transport(settings, Arc::new(transport))
    }
}

impl<T> CatalystClientGeneric<T>
where
    T: Transport + ?Sized + 'static,
{
    /// Create a client over any transport. Settings are validated once here.
    pub fn with_transport(settings: Settings, transport: Arc<T>) -> Result<Self> {
        settings.validate()?;
        let dispatcher =
            BatchDispatcher::new(Arc::clone(&transport), settings.network.max_in_flight);
        Ok(Self {
            settings: Arc::new(settings),
            transport,
            dispatcher,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dispatcher(&self) -> &BatchDispatcher<T> {
        &self.dispatcher
    }

    /// API URL with the given query parameters appended
    pub(crate) fn api_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.settings.api.url)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// GET descriptor for an API method call
    pub(crate) fn api_request(&self, params: &[(&str, &str)]) -> Result<RequestDescriptor> {
        RequestDescriptor::from_url(
            self.api_url(params)?,
            crate::transport::Method::Get,
            None,
            self.settings.network.timeouts(),
        )
    }

    /// Execute one request through the transport
    pub(crate) async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        Ok(self.transport.execute(request).await?)
    }

    /// Run a single API call and return its envelope
    pub(crate) async fn call_api(&self, params: &[(&str, &str)]) -> Result<Envelope> {
        let request = self.api_request(params)?;
        self.fetch_envelope(&request).await
    }

    /// Execute a request whose answer must be an XML envelope
    pub(crate) async fn fetch_envelope(&self, request: &RequestDescriptor) -> Result<Envelope> {
        let response = self.execute(request).await?;
        match ApiResponse::classify(&response, request.url().as_str())? {
            ApiResponse::Envelope(envelope) => {
                debug!(
                    "{} answered (status: {:?}, count: {:?})",
                    envelope.method, envelope.status, envelope.count
                );
                Ok(envelope)
            }
            ApiResponse::Image { .. } => Err(Error::UnexpectedContent {
                content_type: response.content_type,
                url: request.url().to_string(),
            }),
        }
    }

    /// Dispatch a batch honouring the options' cancellation token
    pub(crate) async fn dispatch(
        &self,
        descriptors: Vec<RequestDescriptor>,
        options: &BatchOptions,
    ) -> Vec<RawResult> {
        match &options.cancel {
            Some(token) => self.dispatcher.dispatch_with_cancel(descriptors, token).await,
            None => self.dispatcher.dispatch(descriptors).await,
        }
    }

    /// Check that the API answers `getCategories` with HTTP 200
    pub async fn test_connection(&self) -> Result<()> {
        let request = self.api_request(&[("method", "getCategories")])?;
        let response = self.execute(&request).await?;
        if response.status == 200 {
            Ok(())
        } else {
            Err(Error::HttpStatus {
                status: response.status,
                url: request.url().to_string(),
            })
        }
    }
}
