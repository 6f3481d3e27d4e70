//! Loading monitor
//!
//! A small read-only HTTP surface over a [`crate::loading::LoadingStore`],
//! plus the timer that drives the staleness sweeper.
//!
//! ```text
//! GET /api/health          uptime and in-flight request count
//! GET /api/loading         full snapshot plus per-page status
//! GET /api/loading/{page}  one page's flags, counter and status
//! GET /metrics             Prometheus text format
//! ```

pub mod api;
pub mod server;

pub use server::{AppState, MonitorServer, ServerError, ServerInfo};
