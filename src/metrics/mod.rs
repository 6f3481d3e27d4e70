//! Prometheus metrics for the loading coordinator
//!
//! This module tracks:
//! - Per-page active request count and blocking flag
//! - Requests started and ended, split by full and content-only
//! - Forced resets performed by the staleness sweeper
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! Until then (or if registration fails) every recording call is a no-op,
//! so library users that never initialize metrics pay nothing.

use prometheus::{
    register_counter_vec, register_gauge_vec, CounterVec, Encoder, GaugeVec, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

struct LoadingMetrics {
    active_requests: GaugeVec,
    page_loading: GaugeVec,
    requests_started: CounterVec,
    requests_ended: CounterVec,
    stuck_resets: CounterVec,
}

static LOADING_METRICS: OnceLock<LoadingMetrics> = OnceLock::new();

/// Outcome of the first initialization attempt
static METRICS_INIT_RESULT: OnceLock<Result<(), String>> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once and from several threads; only the first
/// call registers anything, and later calls report its outcome.
///
/// The metrics are process-wide and labelled by page only. Two
/// [`crate::loading::LoadingStore`]s that use the same page key overwrite
/// each other's `waypoint_active_requests` and `waypoint_page_loading`
/// gauges, and their counters are summed.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = waypoint::metrics::init_metrics() {
///     tracing::warn!("Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    METRICS_INIT_RESULT
        .get_or_init(|| match register_metrics() {
            Ok(metrics) => {
                let _ = LOADING_METRICS.set(metrics);
                tracing::info!("Prometheus metrics initialized successfully");
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        })
        .clone()
        .map_err(Into::into)
}

fn register_metrics() -> Result<LoadingMetrics, prometheus::Error> {
    Ok(LoadingMetrics {
        active_requests: register_gauge_vec!(
            "waypoint_active_requests",
            "Requests started but not yet ended, by page",
            &["page"]
        )?,
        page_loading: register_gauge_vec!(
            "waypoint_page_loading",
            "Whether the page shows a blocking loading UI (1 = yes, 0 = no)",
            &["page"]
        )?,
        requests_started: register_counter_vec!(
            "waypoint_requests_started_total",
            "Total tracked requests started, by page and kind",
            &["page", "kind"]
        )?,
        requests_ended: register_counter_vec!(
            "waypoint_requests_ended_total",
            "Total tracked requests ended, by page and kind",
            &["page", "kind"]
        )?,
        stuck_resets: register_counter_vec!(
            "waypoint_stuck_resets_total",
            "Total pages force-cleared by the staleness sweeper",
            &["page"]
        )?,
    })
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    LOADING_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn kind_label(content_only: bool) -> &'static str {
    if content_only {
        "content"
    } else {
        "full"
    }
}

/// Mirror a page's counter and blocking flag
pub fn update_page_gauges(page: &str, active_requests: u32, page_loading: bool) {
    let Some(m) = LOADING_METRICS.get() else {
        return;
    };

    m.active_requests
        .with_label_values(&[page])
        .set(f64::from(active_requests));
    m.page_loading
        .with_label_values(&[page])
        .set(if page_loading { 1.0 } else { 0.0 });
}

pub fn record_request_started(page: &str, content_only: bool) {
    if let Some(m) = LOADING_METRICS.get() {
        m.requests_started
            .with_label_values(&[page, kind_label(content_only)])
            .inc();
    }
}

pub fn record_request_ended(page: &str, content_only: bool) {
    if let Some(m) = LOADING_METRICS.get() {
        m.requests_ended
            .with_label_values(&[page, kind_label(content_only)])
            .inc();
    }
}

pub fn record_stuck_reset(page: &str) {
    if let Some(m) = LOADING_METRICS.get() {
        m.stuck_resets.with_label_values(&[page]).inc();
    }
}

// ============================================================================
// Tests
// ============================================================================
