//! Tracked content fetch tests
//!
//! Every fetch must show its page as loading while in flight and leave the
//! store idle once it settles.

use std::time::Duration;

use waypoint::content::{Destination, Resource};
use waypoint::loading::{Page, PageStatus};
use wiremock::MockServer;

use super::fixtures::{
    client_for, loader_for, mount_json, ARTICLES_JSON, ARTICLE_JSON, COUNTRIES_JSON,
    DESTINATIONS_JSON,
};

#[tokio::test]
async fn test_list_destinations_ends_request() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/destinations", DESTINATIONS_JSON, None).await;

    let (client, store) = client_for(&server, Duration::from_secs(5));
    let destinations = client.destinations(&Page::discover(), false).await.unwrap();

    assert_eq!(destinations.len(), 3);
    assert_eq!(destinations[0].name, "Kyoto");
    assert_eq!(store.active_requests(&Page::discover()), 0);
    assert!(!store.is_page_loading(&Page::discover()));
    assert_eq!(store.in_flight(), 0);
}

#[tokio::test]
async fn test_page_is_loading_while_fetch_in_flight() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/countries",
        COUNTRIES_JSON,
        Some(Duration::from_millis(200)),
    )
    .await;

    let (client, store) = client_for(&server, Duration::from_secs(5));
    let page = Page::country();

    let task_client = client.clone();
    let task_page = page.clone();
    let handle = tokio::spawn(async move { task_client.countries(&task_page, false).await });

    while store.active_requests(&page) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(store.page_status(&page), PageStatus::Skeleton);

    let countries = handle.await.unwrap().unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(store.page_status(&page), PageStatus::Ready);
}

#[tokio::test]
async fn test_get_single_article() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/articles/a1", ARTICLE_JSON, None).await;

    let (client, store) = client_for(&server, Duration::from_secs(5));
    let article = client.article("a1", &Page::article(), false).await.unwrap();

    assert_eq!(article.title, "Ten days in Kansai");
    assert!(article.extra.contains_key("body"));
    assert!(!store.is_page_loading(&Page::article()));
}

#[tokio::test]
async fn test_generic_list_by_resource() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/destinations", DESTINATIONS_JSON, None).await;

    let (client, store) = client_for(&server, Duration::from_secs(5));
    let page = Page::new("custom-landing");
    let destinations: Vec<Destination> = client
        .list(Resource::Destinations, &page, false)
        .await
        .unwrap();

    assert_eq!(destinations.len(), 3);
    assert_eq!(store.pages(), vec![page]);
}

#[tokio::test]
async fn test_load_home_waits_for_slowest_fetch() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/destinations", DESTINATIONS_JSON, None).await;
    mount_json(
        &server,
        "/api/articles",
        ARTICLES_JSON,
        Some(Duration::from_millis(150)),
    )
    .await;

    let (loader, store) = loader_for(&server);
    let home = Page::home();

    let task_loader = loader.clone();
    let handle = tokio::spawn(async move { task_loader.load_home().await });

    // Destinations return immediately; the page must stay loading until the
    // delayed articles fetch also settles.
    let mut saw_single_outstanding = false;
    while !handle.is_finished() {
        if store.active_requests(&home) == 1 {
            saw_single_outstanding = true;
            assert!(store.is_page_loading(&home));
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let content = handle.await.unwrap().unwrap();
    assert!(saw_single_outstanding);
    assert_eq!(content.destinations.len(), 3);
    assert_eq!(content.articles.len(), 2);
    assert!(!store.is_page_loading(&home));
    assert_eq!(store.active_requests(&home), 0);
}

#[tokio::test]
async fn test_load_discover() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/destinations", DESTINATIONS_JSON, None).await;
    mount_json(&server, "/api/countries", COUNTRIES_JSON, None).await;

    let (loader, store) = loader_for(&server);
    let content = loader.load_discover().await.unwrap();

    assert_eq!(content.destinations.len(), 3);
    assert_eq!(content.countries.len(), 2);
    assert_eq!(store.page_status(&Page::discover()), PageStatus::Ready);
}

#[tokio::test]
async fn test_content_only_refresh_shows_inline_spinner() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/articles",
        ARTICLES_JSON,
        Some(Duration::from_millis(150)),
    )
    .await;

    let (loader, store) = loader_for(&server);
    let page = Page::inspiration();

    let task_loader = loader.clone();
    let task_page = page.clone();
    let handle = tokio::spawn(async move { task_loader.refresh_articles(&task_page).await });

    while store.active_requests(&page) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(store.page_status(&page), PageStatus::InlineSpinner);
    assert!(!store.is_page_loading(&page));

    let articles = handle.await.unwrap().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(store.page_status(&page), PageStatus::Ready);
}

#[tokio::test]
async fn test_refresher_preload_blocks_and_refresh_is_inline() {
    use waypoint::content::PageRefresher;

    let server = MockServer::start().await;
    mount_json(&server, "/api/destinations", DESTINATIONS_JSON, None).await;
    mount_json(&server, "/api/countries", COUNTRIES_JSON, None).await;
    mount_json(
        &server,
        "/api/articles",
        ARTICLES_JSON,
        Some(Duration::from_millis(150)),
    )
    .await;

    let (loader, store) = loader_for(&server);
    let refresher = PageRefresher::new(loader, Duration::from_secs(60));

    refresher.preload().await.unwrap();
    assert_eq!(store.page_status(&Page::home()), PageStatus::Ready);
    assert_eq!(store.page_status(&Page::discover()), PageStatus::Ready);

    let task_refresher = refresher.clone();
    let handle = tokio::spawn(async move { task_refresher.refresh().await });

    while store.active_requests(&Page::home()) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(store.page_status(&Page::home()), PageStatus::InlineSpinner);

    handle.await.unwrap().unwrap();
    assert_eq!(store.page_status(&Page::home()), PageStatus::Ready);
    assert_eq!(store.in_flight(), 0);
}
