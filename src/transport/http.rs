//! reqwest-backed transport
//!
//! Every request builds its own client from the timeouts carried by its
//! descriptor and keeps no idle connections, so requests in a batch share
//! nothing but the read-only configuration.

use std::fmt;

use reqwest::{Client, multipart};
use tracing::debug;

use super::{RawResponse, RequestBody, RequestDescriptor, Timeouts, Transport};
use crate::config::Settings;
use crate::error::{TransportError, TransportErrorKind};

/// HTTP basic-auth credentials
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport issuing real HTTP requests
#[derive(Debug, Clone)]
pub struct HttpTransport {
    credentials: Option<Credentials>,
    user_agent: String,
}

impl HttpTransport {
    /// Create a transport without credentials
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            credentials: None,
            user_agent: user_agent.into(),
        }
    }

    /// Set basic-auth credentials
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Transport configured from the API and network sections
    pub fn from_settings(settings: &Settings) -> Self {
        let transport = Self::new(settings.network.user_agent.clone());
        if settings.api.user.is_empty() {
            transport
        } else {
            transport.with_credentials(settings.api.user.clone(), settings.api.password.clone())
        }
    }

    fn client_for(&self, url: &str, timeouts: Timeouts) -> Result<Client, TransportError> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.total)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::from_reqwest(url, &e))
    }

    async fn multipart_form(
        url: &str,
        fields: &[(String, String)],
        file_field: &str,
        path: &std::path::Path,
    ) -> Result<multipart::Form, TransportError> {
        let io_error = |e: std::io::Error| {
            TransportError::new(
                TransportErrorKind::Io,
                url,
                format!("cannot read {}: {}", path.display(), e),
            )
        };

        let file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let length = file.metadata().await.map_err(io_error)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let part = multipart::Part::stream_with_length(reqwest::Body::from(file), length)
            .file_name(file_name);

        let form = fields
            .iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part(file_field.to_string(), part);

        Ok(form)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let url = request.url().as_str();
        let client = self.client_for(url, request.timeouts())?;

        let mut builder = match request.method() {
            super::Method::Get => client.get(request.url().clone()),
            super::Method::Post => client.post(request.url().clone()),
        };

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.user, Some(&credentials.password));
        }

        builder = match request.body() {
            None => builder,
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes.clone()),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            Some(RequestBody::Multipart {
                fields,
                file_field,
                path,
            }) => builder.multipart(Self::multipart_form(url, fields, file_field, path).await?),
        };

        debug!("{} {}", request.method().as_str(), url);

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        debug!(
            "{} {} -> {} ({}, {} bytes)",
            request.method().as_str(),
            url,
            status,
            content_type,
            body.len()
        );

        Ok(RawResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
