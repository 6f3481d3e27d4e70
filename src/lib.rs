//! waypoint - loading-state coordinator for a travel-content client
//!
//! Keeps page-level "is this screen ready" indicators correct while many
//! independently triggered fetches are in flight at once.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`loading`] - Loading store, request tracker and staleness sweeper
//! - [`content`] - Tracked REST client and page loaders for the catalog API
//! - [`monitor`] - Read-only HTTP monitor over a loading store
//! - [`metrics`] - Prometheus metrics for request and sweep activity
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use waypoint::content::{ClientConfig, ContentClient, PageLoader};
//! use waypoint::loading::{LoadingStore, Page, RequestTracker, StalenessSweeper};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = LoadingStore::default();
//!     let _sweeper = StalenessSweeper::with_default_interval(store.clone()).spawn();
//!
//!     let tracker = RequestTracker::new(store.clone());
//!     let client = ContentClient::new(ClientConfig::new("http://localhost:3000"), tracker)?;
//!     let home = PageLoader::new(client).load_home().await?;
//!
//!     assert!(!store.is_page_loading(&Page::home()));
//!     println!("{} destinations", home.destinations.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod loading;
pub mod metrics;
pub mod monitor;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::content::{ContentClient, PageLoader, PageRefresher, Resource};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::loading::{
        LoadingStore, Page, PageStatus, RequestGuard, RequestId, RequestTracker, StalenessSweeper,
    };
}

// Direct re-exports for convenience
pub use loading::{LoadingStore, Page, PageStatus, RequestId, RequestTracker};
