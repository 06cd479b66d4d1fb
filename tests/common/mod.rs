//! Common test utilities and helpers
//!
//! Shared fixtures, settings and wiremock setup for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use core_catalyst::config::Settings;
use core_catalyst::error::{TransportError, TransportErrorKind};
use core_catalyst::transport::{RawResponse, RequestDescriptor, Transport};
use core_catalyst::{CatalystClient, CatalystClientGeneric};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PATH: &str = "/api/video/index";
pub const SCREENSHOT_PATH: &str = "/screens/";
pub const API_USER: &str = "catalyst";
pub const API_PASSWORD: &str = "hunter2";

/// Test configuration factory
pub struct TestConfig;

impl TestConfig {
    /// Settings pointing API and CDN at a mock server
    pub fn for_server(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.api.url = format!("{}{}", server.uri(), API_PATH);
        settings.api.user = API_USER.to_string();
        settings.api.password = API_PASSWORD.to_string();
        settings.cdn.base_url = server.uri();
        settings.cdn.screenshot_path = SCREENSHOT_PATH.to_string();
        settings.network.connect_timeout = 5;
        settings.network.request_timeout = 10;
        settings
    }

    pub fn client(server: &MockServer) -> CatalystClient {
        CatalystClient::new(Self::for_server(server)).unwrap()
    }
}

/// XML fixtures shaped like Core Catalyst responses
pub struct Fixtures;

impl Fixtures {
    pub fn envelope(method: &str, inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><response><{method}>{inner}</{method}></response>"#
        )
    }

    pub fn video(video_id: &str, title: &str) -> String {
        Self::envelope(
            "getStatus",
            &format!(
                "<result><video_id>{video_id}</video_id><title>{title}</title>\
                 <video_url>rtmp://fms.64a2.edgecastcdn.net/0064A2/v/{video_id}.mp4</video_url>\
                 <video_status>5</video_status><status>1</status>\
                 <access_key>key{video_id}</access_key><asset_type>video</asset_type></result>\
                 <error></error><status>success</status><count>1</count>"
            ),
        )
    }

    pub fn api_error(method: &str, message: &str) -> String {
        Self::envelope(method, &format!("<error>{message}</error><count>0</count>"))
    }

    pub fn status(method: &str, status: &str) -> String {
        Self::envelope(method, &format!("<error></error><status>{status}</status>"))
    }

    pub fn categories(entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(id, name)| {
                format!("<category><category_id>{id}</category_id><name>{name}</name></category>")
            })
            .collect();
        Self::envelope(
            "getCategories",
            &format!("<result>{items}</result><count>{}</count>", entries.len()),
        )
    }

    pub fn id_list(method: &str, field: &str, ids: &[&str]) -> String {
        let results: String = ids
            .iter()
            .map(|id| format!("<result><{field}>{id}</{field}></result>"))
            .collect();
        Self::envelope(method, &format!("{results}<count>{}</count>", ids.len()))
    }
}

pub fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/xml;charset=utf-8")
}

pub fn png() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(b"\x89PNG\r\n\x1a\n".to_vec(), "image/png")
}

/// Mock server setup helpers
pub struct MockApi;

impl MockApi {
    /// `getStatus` for one id
    pub async fn video(server: &MockServer, video_id: &str, title: &str) {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("method", "getStatus"))
            .and(query_param("id", video_id))
            .respond_with(xml(Fixtures::video(video_id, title)))
            .mount(server)
            .await;
    }

    /// `getStatus` answered with an embedded error
    pub async fn missing_video(server: &MockServer, video_id: &str) {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("method", "getStatus"))
            .and(query_param("id", video_id))
            .respond_with(xml(Fixtures::api_error("getStatus", "Invalid video id")))
            .mount(server)
            .await;
    }

    pub async fn screenshot(server: &MockServer, video_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}{}.png", SCREENSHOT_PATH, video_id)))
            .respond_with(png())
            .mount(server)
            .await;
    }

    pub async fn respond(server: &MockServer, api_method: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("method", api_method))
            .respond_with(response)
            .mount(server)
            .await;
    }
}

/// Transport double: fixed delay, optional failures, call counting
pub struct ScriptedTransport {
    pub delay: Duration,
    pub fail_ids: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_ids: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.fail_ids.push(id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let id = request
            .url()
            .query_pairs()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        if self.fail_ids.iter().any(|p| *p == id) {
            return Err(TransportError::new(
                TransportErrorKind::Connect,
                request.url().as_str(),
                "connection refused",
            ));
        }

        Ok(RawResponse::new(
            200,
            "text/xml;charset=utf-8",
            Fixtures::video(&id, &format!("Video {id}")),
        ))
    }
}

pub fn scripted_client(
    transport: Arc<ScriptedTransport>,
    max_in_flight: usize,
) -> CatalystClientGeneric<ScriptedTransport> {
    let mut settings = Settings::default();
    settings.api.url = "http://catalyst.test/api/video/index".to_string();
    settings.network.max_in_flight = max_in_flight;
    CatalystClientGeneric::with_transport(settings, transport).unwrap()
}

pub fn status_request(id: &str) -> RequestDescriptor {
    RequestDescriptor::get(
        &format!("http://catalyst.test/api/video/index?method=getStatus&id={id}"),
        core_catalyst::transport::Timeouts::default(),
    )
    .unwrap()
}
