//! HTTP client for the content API
//!
//! Every call is wrapped in [`RequestTracker::track`], so the page it loads
//! for shows as loading while the call is in flight and stops doing so on
//! success, on error, and when the caller drops the future.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::loading::{Page, RequestTracker};

use super::models::{Article, Country, Destination, Resource};

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the content client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the content API, without the `/api` suffix
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("waypoint/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from content API calls
#[derive(Error, Debug)]
pub enum ContentError {
    /// Client could not be built
    #[error("Failed to initialize HTTP client: {0}")]
    Init(String),

    /// Transport-level failure, including timeouts
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("Content API returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Body was not the expected JSON shape
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ContentError {
    /// Check if retrying the call might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Init(_) | Self::Decode { .. } => false,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

// ============================================================================
// Content Client
// ============================================================================

/// Tracked client for the catalog REST API
#[derive(Debug, Clone)]
pub struct ContentClient {
    config: ClientConfig,
    http_client: Client,
    tracker: RequestTracker,
}

impl ContentClient {
    pub fn new(config: ClientConfig, tracker: RequestTracker) -> Result<Self, ContentError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ContentError::Init(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            tracker,
        })
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Fetch a whole collection on behalf of `page`
    pub async fn list<T>(
        &self,
        resource: Resource,
        page: &Page,
        content_only: bool,
    ) -> Result<Vec<T>, ContentError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(&resource.collection_path());
        self.tracker
            .track(page.clone(), content_only, self.get_json(url))
            .await
    }

    /// Fetch one document on behalf of `page`
    pub async fn get<T>(
        &self,
        resource: Resource,
        id: &str,
        page: &Page,
        content_only: bool,
    ) -> Result<T, ContentError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(&resource.item_path(id));
        self.tracker
            .track(page.clone(), content_only, self.get_json(url))
            .await
    }

    pub async fn destinations(&self, page: &Page, content_only: bool) -> Result<Vec<Destination>, ContentError> {
        self.list(Resource::Destinations, page, content_only).await
    }

    pub async fn countries(&self, page: &Page, content_only: bool) -> Result<Vec<Country>, ContentError> {
        self.list(Resource::Countries, page, content_only).await
    }

    pub async fn articles(&self, page: &Page, content_only: bool) -> Result<Vec<Article>, ContentError> {
        self.list(Resource::Articles, page, content_only).await
    }

    pub async fn article(&self, id: &str, page: &Page, content_only: bool) -> Result<Article, ContentError> {
        self.get(Resource::Articles, id, page, content_only).await
    }

    async fn get_json<T>(&self, url: String) -> Result<T, ContentError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "GET");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Content API error");
            return Err(ContentError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ContentError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}
