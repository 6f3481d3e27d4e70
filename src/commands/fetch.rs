use anyhow::{bail, Context, Result};
use serde::Serialize;

use waypoint::config::Config;
use waypoint::content::{ClientConfig, ContentClient, PageLoader, Resource};
use waypoint::loading::{LoadingStore, Page, RequestTracker, StalenessSweeper};

/// Parameters for a single tracked fetch
pub struct FetchParams {
    pub resource: String,
    pub id: Option<String>,
    pub page: String,
    pub content_only: bool,
}

fn build_client(config: &Config) -> Result<(ContentClient, LoadingStore)> {
    let store = LoadingStore::new(config.stuck_timeout());
    let tracker = RequestTracker::new(store.clone());
    let client_config = ClientConfig::new(config.api.base_url.clone()).with_timeout(config.request_timeout());
    let client = ContentClient::new(client_config, tracker).context("Failed to create content client")?;
    Ok((client, store))
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    println!("{label}:");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fetch one collection or document and report the page's loading state
pub async fn fetch(config: Config, params: FetchParams) -> Result<()> {
    let resource = Resource::from_id(&params.resource).map_err(anyhow::Error::msg)?;
    let page = Page::new(params.page);
    let (client, store) = build_client(&config)?;
    let sweeper = StalenessSweeper::new(store.clone(), config.sweep_interval()).spawn();

    println!("Fetching {} for page '{}'", resource, page);
    println!("================================");
    println!("  API: {}", config.api.base_url);
    println!("  Content only: {}", params.content_only);
    println!();

    let result = match &params.id {
        Some(id) => client
            .get::<serde_json::Value>(resource, id, &page, params.content_only)
            .await
            .map(|doc| vec![doc]),
        None => {
            client
                .list::<serde_json::Value>(resource, &page, params.content_only)
                .await
        }
    };

    sweeper.abort();
    print_json("Page state after fetch", &store.page_snapshot(&page))?;
    println!();

    let documents = result.with_context(|| format!("Failed to fetch {resource}"))?;
    println!("Received {} document(s)", documents.len());
    Ok(())
}

/// Load a whole screen through the page loader
pub async fn load_page(config: Config, page: String, id: Option<String>) -> Result<()> {
    let (client, store) = build_client(&config)?;
    let loader = PageLoader::new(client);
    let sweeper = StalenessSweeper::new(store.clone(), config.sweep_interval()).spawn();

    println!("Loading page '{page}' from {}", config.api.base_url);
    println!("================================");

    let outcome = match page.as_str() {
        "home" => loader.load_home().await.map(|home| {
            println!("  Destinations: {}", home.destinations.len());
            println!("  Articles: {}", home.articles.len());
            Page::home()
        }),
        "discover" => loader.load_discover().await.map(|discover| {
            println!("  Destinations: {}", discover.destinations.len());
            println!("  Countries: {}", discover.countries.len());
            Page::discover()
        }),
        "article" => {
            let Some(id) = id else {
                sweeper.abort();
                bail!("--id is required for the article page");
            };
            loader.load_article(&id).await.map(|article| {
                println!("  Title: {}", article.title);
                Page::article()
            })
        }
        other => {
            sweeper.abort();
            bail!("No loader for page '{other}'. Valid options: home, discover, article");
        }
    };

    sweeper.abort();
    println!();
    print_json("Loading state", &store.snapshot())?;

    let page = outcome.with_context(|| format!("Failed to load page '{page}'"))?;
    println!();
    println!("Page '{}' is {}", page, store.page_status(&page).as_str());
    Ok(())
}
