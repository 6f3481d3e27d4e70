//! Page and request identifiers
//!
//! Pages are open-ended string keys: any caller may introduce a new one,
//! and it comes into existence the first time the store sees it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Page
// ============================================================================

/// Key identifying a logical screen
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page(String);

impl Page {
    /// Create a page key from any string
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Landing page
    pub fn home() -> Self {
        Self::new("home")
    }

    /// Destination discovery listing
    pub fn discover() -> Self {
        Self::new("discover")
    }

    /// Single country page
    pub fn country() -> Self {
        Self::new("country")
    }

    /// Single destination page
    pub fn destination() -> Self {
        Self::new("destination")
    }

    /// Blog article page
    pub fn article() -> Self {
        Self::new("article")
    }

    /// Inspiration feed
    pub fn inspiration() -> Self {
        Self::new("inspiration")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Page {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Page {
    fn from(key: String) -> Self {
        Self(key)
    }
}

// ============================================================================
// Request ID
// ============================================================================

/// Identifier of a single in-flight request
///
/// Must be unique within the process lifetime. [`RequestId::generate`]
/// produces a random v4 UUID token; [`RequestId::new`] wraps an id the
/// caller already owns.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, process-unique id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
