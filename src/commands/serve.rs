use anyhow::{Context, Result};

use waypoint::config::Config;
use waypoint::content::{ClientConfig, ContentClient, PageLoader, PageRefresher};
use waypoint::loading::{LoadingStore, RequestTracker};
use waypoint::metrics;
use waypoint::monitor::MonitorServer;

/// Start the loading monitor with its staleness sweeper and page refresher
pub async fn serve(config: Config) -> Result<()> {
    if let Err(e) = metrics::init_metrics() {
        tracing::warn!("Metrics initialization failed: {}", e);
    }

    let store = LoadingStore::new(config.stuck_timeout());
    let tracker = RequestTracker::new(store.clone());
    let client_config = ClientConfig::new(config.api.base_url.clone()).with_timeout(config.request_timeout());
    let client = ContentClient::new(client_config, tracker).context("Failed to create content client")?;
    let refresher = PageRefresher::new(PageLoader::new(client), config.refresh_interval());

    let api_url = config.api.base_url.clone();
    let server = MonitorServer::new(config, store)
        .context("Failed to create loading monitor")?
        .with_refresher(refresher);
    let info = server.info();

    println!("{}", info.display());
    println!();
    println!("Endpoints:");
    println!("  GET  /api/health          - Health check");
    println!("  GET  /api/loading         - Full loading snapshot");
    println!("  GET  /api/loading/{{page}}  - One page's loading state");
    println!("  GET  /metrics             - Prometheus metrics");
    println!();
    println!("Refreshing home and discover from {api_url}");
    println!("Loading monitor listening on http://{}", info.bind_address);
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Loading monitor stopped.");
    Ok(())
}
