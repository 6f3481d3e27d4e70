//! Loading monitor server
//!
//! Serves the read-only monitor API and owns the background tasks that
//! run beside it: the staleness sweeper and, when attached, a page
//! refresher writing to the same store.

use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::content::PageRefresher;
use crate::loading::{LoadingStore, StalenessSweeper};

use super::api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loading store being monitored
    pub store: LoadingStore,

    /// Server start time
    pub start_time: Instant,
}

// ============================================================================
// Monitor Server
// ============================================================================

/// HTTP monitor over a [`LoadingStore`]
pub struct MonitorServer {
    config: Config,
    state: AppState,
    refresher: Option<PageRefresher>,
}

impl MonitorServer {
    /// Create a new monitor server
    pub fn new(config: Config, store: LoadingStore) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let state = AppState {
            store,
            start_time: Instant::now(),
        };

        Ok(Self {
            config,
            state,
            refresher: None,
        })
    }

    /// Run `refresher` beside the server
    ///
    /// Its loader should track requests against this server's store.
    pub fn with_refresher(mut self, refresher: PageRefresher) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.config.server.bind_address;
        tracing::info!("Starting loading monitor on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        self.serve_listener(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener
    ///
    /// Background tasks start here, after the bind, and are stopped once
    /// the HTTP server has drained.
    pub async fn serve_listener(
        &self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let tasks = self.start_background_tasks();

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()));

        for task in &tasks {
            task.abort();
        }
        tracing::info!("Loading monitor shutdown complete");
        served
    }

    /// Start the staleness sweeper and the page refresher, if any
    fn start_background_tasks(&self) -> Vec<JoinHandle<()>> {
        let mut tasks = vec![
            StalenessSweeper::new(self.state.store.clone(), self.config.sweep_interval()).spawn(),
        ];
        if let Some(refresher) = &self.refresher {
            tasks.push(refresher.clone().spawn());
        }
        tasks
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.server.bind_address,
            stuck_timeout_ms: self.config.loading.stuck_timeout_ms,
            sweep_interval_ms: self.config.loading.sweep_interval_ms,
            refresh_interval_secs: self.refresher.as_ref().map(|r| r.interval().as_secs()),
            cors_enabled: self.config.server.enable_cors,
            request_logging_enabled: self.config.server.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub stuck_timeout_ms: u64,
    pub sweep_interval_ms: u64,
    pub refresh_interval_secs: Option<u64>,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        let refresh = match self.refresh_interval_secs {
            Some(secs) => format!("every {secs}s"),
            None => "disabled".to_string(),
        };
        format!(
            "Loading Monitor\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Stuck Timeout: {}ms\n\
             Sweep Interval: {}ms\n\
             Page Refresh: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            self.stuck_timeout_ms,
            self.sweep_interval_ms,
            refresh,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Error, Debug, Clone)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================
