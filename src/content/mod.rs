//! Data-fetching callers of the loading store
//!
//! [`ContentClient`] talks to the catalog REST API (`/api/destinations`,
//! `/api/countries`, `/api/articles`) and routes every call through a
//! [`crate::loading::RequestTracker`]. [`PageLoader`] composes those calls
//! into whole screens, and [`PageRefresher`] replays those on a timer.

pub mod client;
pub mod loader;
pub mod models;
pub mod refresher;

pub use client::{ClientConfig, ContentClient, ContentError};
pub use loader::{DiscoverContent, HomeContent, PageLoader};
pub use models::{Article, Country, Destination, Resource};
pub use refresher::PageRefresher;
