// HttpFeedSource against a local mock provider

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use event_feed_api::{
    error::FetchError,
    services::{FeedSource, HttpFeedSource},
};

use test_helpers::*;

async fn source_for(server: &MockServer) -> HttpFeedSource {
    HttpFeedSource::new(format!("{}/api/events", server.uri()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn returns_body_on_success() {
    let server = MockServer::start().await;
    let xml = feed_xml(&[FeedEvent::online("1", "A")]);
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let body = source_for(&server).await.fetch().await.unwrap();
    assert_eq!(body, xml.into_bytes());
}

#[tokio::test]
async fn non_success_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = source_for(&server).await.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let source =
        HttpFeedSource::new(format!("{}/api/events", server.uri()), Duration::from_millis(200))
            .unwrap();
    let err = source.fetch().await.unwrap_err();
    match err {
        FetchError::Request(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_provider_is_fetch_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let source = HttpFeedSource::new("http://127.0.0.1:9/api/events", Duration::from_secs(2)).unwrap();
    assert!(matches!(source.fetch().await, Err(FetchError::Request(_))));
}
