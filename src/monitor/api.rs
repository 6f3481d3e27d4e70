//! REST API handlers for the loading monitor
//!
//! Read-only: the monitor reports loading state, it never mutates it.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::loading::{LoadingSnapshot, Page, PageSnapshot};
use crate::metrics;

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub in_flight: usize,
}

/// Full loading state plus the pages derived from it
#[derive(Debug, Serialize)]
pub struct LoadingResponse {
    pub state: LoadingSnapshot,
    pub pages: Vec<PageSnapshot>,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/loading", get(get_loading))
        .route("/api/loading/{page}", get(get_page_loading))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        in_flight: state.store.in_flight(),
    }))
}

async fn get_loading(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    let pages = state
        .store
        .pages()
        .iter()
        .map(|page| state.store.page_snapshot(page))
        .collect();

    Json(ApiResponse::success(LoadingResponse {
        state: snapshot,
        pages,
    }))
}

/// Unknown pages are reported as idle, not 404: pages exist implicitly
async fn get_page_loading(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> axum::response::Response {
    if page.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Page key must not be empty")),
        )
            .into_response();
    }

    let snapshot = state.store.page_snapshot(&Page::new(page));
    (StatusCode::OK, Json(ApiResponse::success(snapshot))).into_response()
}

async fn get_metrics() -> axum::response::Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to encode metrics: {e}"))),
        )
            .into_response(),
    }
}

// ============================================================================
// Tests
// ============================================================================
