//! Loading monitor endpoint tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use waypoint::config::Config;
use waypoint::loading::{LoadingStore, Page, RequestId};
use waypoint::monitor::MonitorServer;

async fn get_json(server: &MonitorServer, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = server
        .build_router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn server_with_store() -> (MonitorServer, LoadingStore) {
    let store = LoadingStore::default();
    let server = MonitorServer::new(Config::default(), store.clone()).unwrap();
    (server, store)
}

#[tokio::test]
async fn test_health_reports_in_flight() {
    let (server, store) = server_with_store();
    store.start_request(&Page::home(), &RequestId::new("r1"), false);

    let (status, body) = get_json(&server, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["in_flight"], 1);
}

#[tokio::test]
async fn test_loading_snapshot() {
    let (server, store) = server_with_store();
    store.start_request(&Page::country(), &RequestId::new("r1"), false);
    store.start_request(&Page::country(), &RequestId::new("r2"), true);

    let (status, body) = get_json(&server, "/api/loading").await;

    assert_eq!(status, StatusCode::OK);
    let state = &body["data"]["state"];
    assert_eq!(state["pageLoading"]["country"], true);
    assert_eq!(state["isContentLoading"]["country"], true);
    assert_eq!(state["activeRequests"]["country"], 2);
    assert_eq!(state["requestLoading"]["r1"], true);

    let pages = body["data"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["status"], "skeleton");
}

#[tokio::test]
async fn test_page_endpoint_reflects_store() {
    let (server, store) = server_with_store();
    let page = Page::article();
    store.start_request(&page, &RequestId::new("refresh"), true);

    let (_, body) = get_json(&server, "/api/loading/article").await;
    assert_eq!(body["data"]["status"], "inline_spinner");
    assert_eq!(body["data"]["activeRequests"], 1);

    store.end_request(&page, &RequestId::new("refresh"), true);

    let (_, body) = get_json(&server, "/api/loading/article").await;
    assert_eq!(body["data"]["status"], "ready");
    assert_eq!(body["data"]["activeRequests"], 0);
}

#[tokio::test]
async fn test_unknown_page_is_idle() {
    let (server, _store) = server_with_store();

    let (status, body) = get_json(&server, "/api/loading/never-seen").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], "never-seen");
    assert_eq!(body["data"]["pageLoading"], false);
    assert_eq!(body["data"]["status"], "ready");
    assert!(body["data"]["lastUpdated"].is_null());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    waypoint::metrics::init_metrics().unwrap();
    let (server, store) = server_with_store();
    store.start_request(&Page::new("monitor-metrics"), &RequestId::new("m1"), false);

    let response = server
        .build_router()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("waypoint_requests_started_total"));
    assert!(text.contains("monitor-metrics"));
}

#[tokio::test]
async fn test_served_store_reports_refresher_loads() {
    use std::time::Duration;
    use waypoint::content::PageRefresher;
    use wiremock::MockServer;

    use super::fixtures::{
        loader_for, mount_json, ARTICLES_JSON, COUNTRIES_JSON, DESTINATIONS_JSON,
    };

    let api = MockServer::start().await;
    let delay = Some(Duration::from_millis(300));
    mount_json(&api, "/api/destinations", DESTINATIONS_JSON, delay).await;
    mount_json(&api, "/api/articles", ARTICLES_JSON, delay).await;
    mount_json(&api, "/api/countries", COUNTRIES_JSON, delay).await;

    let (loader, store) = loader_for(&api);
    let refresher = PageRefresher::new(loader, Duration::from_secs(60));
    let server = MonitorServer::new(Config::default(), store.clone())
        .unwrap()
        .with_refresher(refresher);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/loading", listener.local_addr().unwrap());
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_listener(listener, async {
                let _ = rx.await;
            })
            .await
    });

    let http = reqwest::Client::new();
    let loading: serde_json::Value = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(response) = http.get(&url).send().await {
                let body: serde_json::Value = response.json().await.unwrap();
                if body["data"]["state"]["activeRequests"]["home"].as_u64().unwrap_or(0) > 0 {
                    return body;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("monitor never reported the preload");

    assert_eq!(loading["data"]["state"]["pageLoading"]["home"], true);

    tokio::time::timeout(Duration::from_secs(5), async {
        while store.in_flight() > 0 || store.pages().len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("preload never settled");

    assert!(!store.is_page_loading(&Page::home()));
    assert!(!store.is_page_loading(&Page::discover()));

    drop(http);
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
