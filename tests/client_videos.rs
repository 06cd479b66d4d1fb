//! Video operations against a mock Core Catalyst server

mod common;

use common::{API_PASSWORD, API_PATH, API_USER, Fixtures, MockApi, TestConfig, xml};
use core_catalyst::Error;
use core_catalyst::error::TransportErrorKind;
use core_catalyst::types::{Toggle, VideoStatus, VideoUpdate};
use pretty_assertions::assert_eq;
use wiremock::matchers::{basic_auth, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_info_maps_fields_and_screenshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "getStatus"))
        .and(query_param("id", "762"))
        .and(basic_auth(API_USER, API_PASSWORD))
        .respond_with(xml(Fixtures::video("762", "Intro to Limits")))
        .expect(1)
        .mount(&server)
        .await;
    MockApi::screenshot(&server, "762").await;

    let client = TestConfig::client(&server);
    let details = client.get_info("762").await.unwrap();

    assert_eq!(details.video_id.as_deref(), Some("762"));
    assert_eq!(details.title.as_deref(), Some("Intro to Limits"));
    assert_eq!(details.access_key.as_deref(), Some("key762"));
    assert_eq!(details.asset_type.as_deref(), Some("video"));
    assert_eq!(details.video_status_code(), Some(VideoStatus::Ready));
    assert_eq!(
        details.screenshot,
        Some(format!("{}/screens/762.png", server.uri()))
    );
}

#[tokio::test]
async fn test_get_info_without_screenshot() {
    let server = MockServer::start().await;
    MockApi::video(&server, "5", "No image").await;

    let client = TestConfig::client(&server);
    let details = client.get_info("5").await.unwrap();

    assert_eq!(details.title.as_deref(), Some("No image"));
    assert_eq!(details.screenshot, None);
}

#[tokio::test]
async fn test_get_info_embedded_error() {
    let server = MockServer::start().await;
    MockApi::missing_video(&server, "999").await;

    let client = TestConfig::client(&server);
    let err = client.get_info("999").await.unwrap_err();

    match err {
        Error::Envelope { method, message } => {
            assert_eq!(method, "getStatus");
            assert_eq!(message, "Invalid video id");
        }
        other => panic!("Expected envelope error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_info_rejects_html() {
    let server = MockServer::start().await;
    MockApi::respond(
        &server,
        "getStatus",
        ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
    )
    .await;

    let client = TestConfig::client(&server);
    let err = client.get_info("1").await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedContent { .. }));
}

#[tokio::test]
async fn test_get_info_empty_id_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    let err = client.get_info("  ").await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_get_info_multi_keeps_good_entries() {
    let server = MockServer::start().await;
    MockApi::video(&server, "1", "First").await;
    MockApi::video(&server, "2", "Second").await;
    MockApi::missing_video(&server, "3").await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("id", "4"))
        .respond_with(xml("<response><getStatus><result>"))
        .mount(&server)
        .await;
    MockApi::screenshot(&server, "2").await;

    let client = TestConfig::client(&server);
    let videos = client.get_info_multi(&["1", "2", "3", "4"]).await.unwrap();

    let mut ids: Vec<_> = videos.keys().cloned().collect();
    ids.sort();
    assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    assert_eq!(videos["1"].title.as_deref(), Some("First"));
    assert_eq!(videos["1"].screenshot, None);
    assert!(videos["2"].screenshot.is_some());
}

#[tokio::test]
async fn test_get_info_multi_keys_by_payload_id() {
    let server = MockServer::start().await;
    // Asking for "legacy-7" returns the canonical id 7
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("id", "legacy-7"))
        .respond_with(xml(Fixtures::video("7", "Renumbered")))
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    let videos = client.get_info_multi(&["legacy-7"]).await.unwrap();

    assert!(videos.contains_key("7"));
    assert!(!videos.contains_key("legacy-7"));
}

#[tokio::test]
async fn test_get_video_status() {
    let server = MockServer::start().await;
    MockApi::video(&server, "762", "Ready").await;

    let client = TestConfig::client(&server);
    assert_eq!(
        client.get_video_status("762").await.unwrap(),
        VideoStatus::Ready
    );
}

#[tokio::test]
async fn test_update_info_strips_disallowed_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "update"))
        .and(query_param("id", "762"))
        .and(query_param("title", "<b>New</b> title"))
        .and(query_param("published", "1"))
        .and(query_param_is_missing("description"))
        .respond_with(xml(Fixtures::status("update", "success")))
        .expect(1)
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    let update = VideoUpdate::new()
        .with_title("<b>New</b> <script>title</script>")
        .with_published(Toggle::On);

    client.update_info("762", &update).await.unwrap();
}

#[tokio::test]
async fn test_update_info_api_error() {
    let server = MockServer::start().await;
    MockApi::respond(&server, "update", xml(Fixtures::api_error("update", "Permission denied")))
        .await;

    let client = TestConfig::client(&server);
    let update = VideoUpdate::new().with_embed(Toggle::Off);
    let err = client.update_info("762", &update).await.unwrap_err();
    assert!(matches!(err, Error::Envelope { .. }));
}

#[tokio::test]
async fn test_delete_requires_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "delete"))
        .and(query_param("id", "1"))
        .respond_with(xml(Fixtures::status("delete", "success")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "delete"))
        .and(query_param("id", "2"))
        .respond_with(xml(Fixtures::status("delete", "failure")))
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    assert!(client.delete_video("1").await.is_ok());
    assert!(matches!(
        client.delete_video("2").await,
        Err(Error::Envelope { .. })
    ));
}

#[tokio::test]
async fn test_connection_check() {
    let server = MockServer::start().await;
    MockApi::respond(&server, "getCategories", xml(Fixtures::categories(&[("1", "Art")]))).await;

    let client = TestConfig::client(&server);
    assert!(client.test_connection().await.is_ok());
}

#[tokio::test]
async fn test_connection_check_unauthorized() {
    let server = MockServer::start().await;
    MockApi::respond(&server, "getCategories", ResponseTemplate::new(401)).await;

    let client = TestConfig::client(&server);
    assert!(matches!(
        client.test_connection().await,
        Err(Error::HttpStatus { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Reserve a port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut settings = core_catalyst::Settings::default();
    settings.api.url = format!("http://127.0.0.1:{}{}", port, API_PATH);
    settings.network.connect_timeout = 2;

    let client = core_catalyst::CatalystClient::new(settings).unwrap();
    match client.get_info("1").await {
        Err(Error::Transport(err)) => {
            assert_eq!(err.kind, TransportErrorKind::Connect);
            assert!(err.url.contains("method=getStatus"));
        }
        other => panic!("Expected transport error, got {:?}", other),
    }
}
