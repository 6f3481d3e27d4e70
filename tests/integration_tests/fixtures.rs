//! Test fixtures for integration tests
//!
//! Sample API payloads and helpers that wire a content client to a mock
//! server and a fresh loading store.

use std::time::Duration;

use waypoint::content::{ClientConfig, ContentClient, PageLoader};
use waypoint::loading::{LoadingStore, RequestTracker};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DESTINATIONS_JSON: &str = r#"[
    {"_id": "d1", "name": "Kyoto", "slug": "kyoto", "country": "Japan", "rating": 4.8},
    {"_id": "d2", "name": "Lisbon", "slug": "lisbon", "country": "Portugal"},
    {"_id": "d3", "name": "Cusco", "slug": "cusco", "country": "Peru"}
]"#;

pub const COUNTRIES_JSON: &str = r#"[
    {"_id": "c1", "name": "Japan", "slug": "japan"},
    {"_id": "c2", "name": "Portugal", "slug": "portugal"}
]"#;

pub const ARTICLES_JSON: &str = r#"[
    {"_id": "a1", "title": "Ten days in Kansai", "slug": "ten-days-in-kansai"},
    {"_id": "a2", "title": "Eating through Lisbon", "slug": "eating-through-lisbon"}
]"#;

pub const ARTICLE_JSON: &str =
    r#"{"_id": "a1", "title": "Ten days in Kansai", "slug": "ten-days-in-kansai", "body": "..."}"#;

/// Client and store pointed at `server`
pub fn client_for(server: &MockServer, timeout: Duration) -> (ContentClient, LoadingStore) {
    let store = LoadingStore::default();
    let tracker = RequestTracker::new(store.clone());
    let config = ClientConfig::new(server.uri()).with_timeout(timeout);
    let client = ContentClient::new(config, tracker).expect("client should build");
    (client, store)
}

/// Page loader and store pointed at `server`
pub fn loader_for(server: &MockServer) -> (PageLoader, LoadingStore) {
    let (client, store) = client_for(server, Duration::from_secs(5));
    (PageLoader::new(client), store)
}

/// Serve `body` as JSON at `route`, optionally after a delay
pub async fn mount_json(server: &MockServer, route: &str, body: &str, delay: Option<Duration>) {
    let mut response = ResponseTemplate::new(200)
        .insert_header("content-type", "application/json")
        .set_body_string(body);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}
