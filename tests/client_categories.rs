//! Category listings and assignments against a mock server

mod common;

use common::{API_PATH, Fixtures, MockApi, TestConfig, xml};
use core_catalyst::Error;
use core_catalyst::config::SortCriteria;
use core_catalyst::types::Category;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

async fn mount_categories(server: &MockServer) {
    MockApi::respond(
        server,
        "getCategories",
        xml(Fixtures::categories(&[
            ("12", "science"),
            ("3", "Mathematics"),
            ("7", "Art"),
        ])),
    )
    .await;
}

#[tokio::test]
async fn test_get_categories_index_order() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    let client = TestConfig::client(&server);
    let categories = client.get_categories().await.unwrap();

    assert_eq!(
        categories,
        vec![
            Category::new("3", "Mathematics"),
            Category::new("7", "Art"),
            Category::new("12", "science"),
        ]
    );
}

#[tokio::test]
async fn test_get_categories_alpha_order() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    let mut settings = TestConfig::for_server(&server);
    settings.listing.sort = SortCriteria::Alpha;
    let client = core_catalyst::CatalystClient::new(settings).unwrap();

    let names: Vec<String> = client
        .get_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Art", "Mathematics", "science"]);
}

#[tokio::test]
async fn test_get_categories_empty_result() {
    let server = MockServer::start().await;
    MockApi::respond(&server, "getCategories", xml(Fixtures::categories(&[]))).await;

    let client = TestConfig::client(&server);
    let err = client.get_categories().await.unwrap_err();
    assert!(matches!(err, Error::EmptyResult { .. }));
}

#[tokio::test]
async fn test_get_category_video_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "getCategoryVideoIds"))
        .and(query_param("categoryId", "7"))
        .respond_with(xml(Fixtures::id_list(
            "getCategoryVideoIds",
            "video_id",
            &["101", "102", "103"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    let ids = client.get_category_video_ids("7").await.unwrap();
    assert_eq!(ids, vec!["101", "102", "103"]);
}

#[tokio::test]
async fn test_get_category_video_ids_empty_category() {
    let server = MockServer::start().await;
    MockApi::respond(
        &server,
        "getCategoryVideoIds",
        xml(Fixtures::id_list("getCategoryVideoIds", "video_id", &[])),
    )
    .await;

    let client = TestConfig::client(&server);
    assert!(matches!(
        client.get_category_video_ids("7").await,
        Err(Error::EmptyResult { .. })
    ));
}

#[tokio::test]
async fn test_get_category_videos_skips_missing() {
    let server = MockServer::start().await;
    MockApi::respond(
        &server,
        "getCategoryVideoIds",
        xml(Fixtures::id_list(
            "getCategoryVideoIds",
            "video_id",
            &["20", "4", "9"],
        )),
    )
    .await;
    MockApi::video(&server, "20", "Fractions").await;
    MockApi::video(&server, "4", "Algebra").await;
    MockApi::missing_video(&server, "9").await;

    let client = TestConfig::client(&server);
    let videos = client.get_category_videos("7").await.unwrap();

    let summary: Vec<(&str, &str)> = videos
        .iter()
        .map(|v| (v.video_id.as_str(), v.title.as_str()))
        .collect();
    assert_eq!(summary, vec![("4", "Algebra"), ("20", "Fractions")]);
}

#[tokio::test]
async fn test_get_categories_by_video_id_resolves_names() {
    let server = MockServer::start().await;
    mount_categories(&server).await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "getVideoCategoryIds"))
        .and(query_param("videoId", "762"))
        .respond_with(xml(Fixtures::id_list(
            "getVideoCategoryIds",
            "category_id",
            &["12", "40", "3"],
        )))
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    let categories = client.get_categories_by_video_id("762").await.unwrap();

    assert_eq!(
        categories,
        vec![
            Category::new("3", "Mathematics"),
            Category::new("12", "science"),
            Category::new("40", ""),
        ]
    );
}

#[tokio::test]
async fn test_categories_by_video_id_without_category_names() {
    let server = MockServer::start().await;
    MockApi::respond(&server, "getCategories", xml(Fixtures::categories(&[]))).await;
    MockApi::respond(
        &server,
        "getVideoCategoryIds",
        xml(Fixtures::id_list("getVideoCategoryIds", "category_id", &["9", "2"])),
    )
    .await;

    let client = TestConfig::client(&server);
    let categories = client.get_categories_by_video_id("762").await.unwrap();

    assert_eq!(
        categories,
        vec![Category::new("2", ""), Category::new("9", "")]
    );
}

#[tokio::test]
async fn test_set_and_unset_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "addVideoToCategory"))
        .and(query_param("videoId", "762"))
        .and(query_param("categoryId", "7"))
        .respond_with(xml(Fixtures::status("addVideoToCategory", "success")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "removeVideoFromCategory"))
        .respond_with(xml(Fixtures::status("removeVideoFromCategory", "failure")))
        .expect(1)
        .mount(&server)
        .await;

    let client = TestConfig::client(&server);
    client.set_category("762", "7").await.unwrap();

    match client.unset_category("762", "7").await {
        Err(Error::Envelope { method, .. }) => assert_eq!(method, "removeVideoFromCategory"),
        other => panic!("Expected envelope error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_set_category_requires_ids() {
    let server = MockServer::start().await;
    let client = TestConfig::client(&server);

    assert!(matches!(
        client.set_category("", "7").await,
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        client.set_category("762", " ").await,
        Err(Error::Validation { .. })
    ));
}
