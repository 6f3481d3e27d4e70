//! Keeps screens warm in the background
//!
//! The first pass loads `home` and `discover` as blocking loads. Later
//! passes refresh their lists content-only, so a page that is already
//! rendered shows an inline indicator instead of a skeleton. Every fetch
//! goes through the client's tracker, so a monitor over the same store
//! sees each pass.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::loading::Page;

use super::loader::PageLoader;

/// Timer-driven preload and refresh of the catalog screens
#[derive(Debug, Clone)]
pub struct PageRefresher {
    loader: PageLoader,
    interval: Duration,
}

impl PageRefresher {
    pub fn new(loader: PageLoader, interval: Duration) -> Self {
        Self { loader, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocking load of `home` and `discover`
    pub async fn preload(&self) -> Result<()> {
        let (home, discover) = tokio::join!(self.loader.load_home(), self.loader.load_discover());
        let home = home?;
        let discover = discover?;

        tracing::info!(
            destinations = home.destinations.len(),
            articles = home.articles.len(),
            countries = discover.countries.len(),
            "Preloaded home and discover"
        );
        Ok(())
    }

    /// Content-only refresh of the lists on `home` and `discover`
    pub async fn refresh(&self) -> Result<()> {
        let home = Page::home();
        let discover = Page::discover();
        let (articles, destinations) = tokio::join!(
            self.loader.refresh_articles(&home),
            self.loader.refresh_destinations(&discover),
        );
        let articles = articles?;
        let destinations = destinations?;

        tracing::debug!(
            articles = articles.len(),
            destinations = destinations.len(),
            "Refreshed home and discover"
        );
        Ok(())
    }

    /// Refresh forever on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run_until(std::future::pending::<()>()).await;
        })
    }

    /// Preload, then refresh on every tick until `shutdown` resolves
    ///
    /// A failed preload is retried on the next tick.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Page refresher started"
        );

        let mut preloaded = false;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let pass = if preloaded { self.refresh().await } else { self.preload().await };
                    match pass {
                        Ok(()) => preloaded = true,
                        Err(e) => tracing::warn!(
                            category = e.category().as_str(),
                            recoverable = e.is_recoverable(),
                            "Page refresh failed: {}",
                            e
                        ),
                    }
                }
            }
        }

        tracing::info!("Page refresher stopped");
    }
}
