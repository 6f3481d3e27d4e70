//! Unified error handling for the waypoint crate
//!
//! Loading-store operations cannot fail. Errors come from the edges: the
//! content API, the monitor server and configuration. This module folds
//! them into one [`Error`] while keeping the domain errors available.
//! [`crate::content::PageRefresher`] reports failed passes through it.
//!
//! ```rust,ignore
//! use waypoint::error::{Error, ErrorCategory};
//!
//! fn handle(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "Retrying: {}", err);
//!     } else {
//!         tracing::error!("Fatal error: {}", err);
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::content::ContentError;
pub use crate::monitor::ServerError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP transport and status errors
    Network,
    /// Response bodies that did not decode
    Parsing,
    /// Monitor server errors
    Server,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Server => "server",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the waypoint crate
#[derive(Error, Debug)]
pub enum Error {
    /// Content API errors
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Monitor server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Content(e) => e.is_recoverable(),
            Self::Server(ServerError::Bind(_)) => true,
            Self::Server(_) => false,
            Self::Config(_) | Self::Other(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Content(ContentError::Decode { .. }) => ErrorCategory::Parsing,
            Self::Content(ContentError::Init(_)) => ErrorCategory::Config,
            Self::Content(_) => ErrorCategory::Network,
            Self::Server(ServerError::Config(_)) | Self::Config(_) => ErrorCategory::Config,
            Self::Server(_) => ErrorCategory::Server,
            Self::Other(_) => ErrorCategory::Other,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
