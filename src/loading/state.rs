//! The loading-state aggregate
//!
//! Pure data plus pure transitions. Every transition takes the current time
//! as an argument, so this type never reads a clock and never does I/O;
//! [`super::store::LoadingStore`] supplies both time and locking.
//!
//! Clearing rule: a page's flags clear only when its shared
//! `active_requests` counter reaches zero. A content-only request that is
//! still in flight keeps a page's blocking flag set even after the full load
//! finished, and the reverse. The two flags are coupled through one counter
//! on purpose; do not split it without a product decision.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::page::{Page, RequestId};

// ============================================================================
// Page Status
// ============================================================================

/// What a view should render for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Full-page blocking skeleton
    Skeleton,

    /// Normal content with a lighter inline indicator
    InlineSpinner,

    /// Normal content
    Ready,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skeleton => "skeleton",
            Self::InlineSpinner => "inline_spinner",
            Self::Ready => "ready",
        }
    }
}

// ============================================================================
// Loading State
// ============================================================================

/// Process-wide loading aggregate
///
/// Missing map entries read as `false` / `0`.
#[derive(Debug, Clone, Default)]
pub struct LoadingState {
    app_loading: bool,
    page_loading: HashMap<Page, bool>,
    is_content_loading: HashMap<Page, bool>,
    active_requests: HashMap<Page, u32>,
    request_loading: HashMap<RequestId, bool>,
    last_updated: HashMap<Page, DateTime<Utc>>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Set the global application flag
    pub fn set_app_loading(&mut self, is_loading: bool) {
        self.app_loading = is_loading;
    }

    /// Override a page's blocking flag directly
    ///
    /// Clearing the flag is an authoritative reset: the active counter for
    /// the page goes back to zero. Request entries are left alone, so a late
    /// `end_request` for one of them is still a harmless no-op.
    pub fn set_page_loading(&mut self, page: &Page, is_loading: bool, now: DateTime<Utc>) {
        self.page_loading.insert(page.clone(), is_loading);
        if !is_loading {
            self.active_requests.insert(page.clone(), 0);
        }
        self.touch(page, now);
    }

    /// Record the start of a request
    pub fn start_request(
        &mut self,
        page: &Page,
        request_id: &RequestId,
        content_only: bool,
        now: DateTime<Utc>,
    ) {
        self.request_loading.insert(request_id.clone(), true);

        let count = self.active_requests.entry(page.clone()).or_insert(0);
        *count = count.saturating_add(1);

        if content_only {
            self.is_content_loading.insert(page.clone(), true);
        } else {
            self.page_loading.insert(page.clone(), true);
        }

        self.touch(page, now);
    }

    /// Record the end of a request
    ///
    /// Calling this twice for the same id is safe: the request entry is
    /// already gone and the counter floors at zero.
    pub fn end_request(
        &mut self,
        page: &Page,
        request_id: &RequestId,
        content_only: bool,
        now: DateTime<Utc>,
    ) {
        self.request_loading.remove(request_id);

        let count = self.active_requests.entry(page.clone()).or_insert(0);
        *count = count.saturating_sub(1);

        if *count == 0 {
            if !content_only {
                self.page_loading.insert(page.clone(), false);
            }
            self.is_content_loading.insert(page.clone(), false);
        }

        self.touch(page, now);
    }

    /// Force-clear every page that has been loading longer than `timeout`
    ///
    /// Returns the pages that were reset.
    pub fn reset_stuck_loading_states(&mut self, now: DateTime<Utc>, timeout: Duration) -> Vec<Page> {
        let stuck: Vec<Page> = self
            .page_loading
            .iter()
            .filter(|(_, loading)| **loading)
            .filter(|(page, _)| {
                self.last_updated
                    .get(*page)
                    .map_or(true, |updated| now - *updated > timeout)
            })
            .map(|(page, _)| page.clone())
            .collect();

        for page in &stuck {
            let abandoned = self.active_requests(page);
            tracing::warn!(
                page = %page,
                active_requests = abandoned,
                timeout_ms = timeout.num_milliseconds(),
                "Resetting stuck loading state for page {}",
                page
            );

            self.page_loading.insert(page.clone(), false);
            self.active_requests.insert(page.clone(), 0);
            self.touch(page, now);
        }

        stuck
    }

    fn touch(&mut self, page: &Page, now: DateTime<Utc>) {
        self.last_updated.insert(page.clone(), now);
    }

    // ------------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------------

    pub fn is_app_loading(&self) -> bool {
        self.app_loading
    }

    /// Whether the page should show a full blocking loading UI
    pub fn is_page_loading(&self, page: &Page) -> bool {
        self.page_loading.get(page).copied().unwrap_or(false)
    }

    /// Whether the page should show an inline loading indicator
    pub fn is_content_loading(&self, page: &Page) -> bool {
        self.is_content_loading.get(page).copied().unwrap_or(false)
    }

    /// Number of started-but-not-ended requests for the page
    pub fn active_requests(&self, page: &Page) -> u32 {
        self.active_requests.get(page).copied().unwrap_or(0)
    }

    /// Whether the request is still in flight
    pub fn is_request_loading(&self, request_id: &RequestId) -> bool {
        self.request_loading.contains_key(request_id)
    }

    pub fn last_updated(&self, page: &Page) -> Option<DateTime<Utc>> {
        self.last_updated.get(page).copied()
    }

    /// Rendering decision for the page; the blocking flag wins
    pub fn page_status(&self, page: &Page) -> PageStatus {
        if self.is_page_loading(page) {
            PageStatus::Skeleton
        } else if self.is_content_loading(page) {
            PageStatus::InlineSpinner
        } else {
            PageStatus::Ready
        }
    }

    /// Number of requests in flight across all pages
    pub fn in_flight(&self) -> usize {
        self.request_loading.len()
    }

    /// Every page the aggregate has seen
    pub fn pages(&self) -> Vec<Page> {
        let mut pages: Vec<Page> = self.last_updated.keys().cloned().collect();
        pages.sort();
        pages
    }

    /// Copy of the whole aggregate
    pub fn snapshot(&self) -> LoadingSnapshot {
        LoadingSnapshot {
            app_loading: self.app_loading,
            page_loading: self.page_loading.clone(),
            is_content_loading: self.is_content_loading.clone(),
            active_requests: self.active_requests.clone(),
            request_loading: self.request_loading.clone(),
            last_updated: self.last_updated.clone(),
        }
    }

    /// Copy of one page's slice of the aggregate
    pub fn page_snapshot(&self, page: &Page) -> PageSnapshot {
        PageSnapshot {
            page: page.clone(),
            page_loading: self.is_page_loading(page),
            is_content_loading: self.is_content_loading(page),
            active_requests: self.active_requests(page),
            last_updated: self.last_updated(page),
            status: self.page_status(page),
        }
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Serializable copy of the aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingSnapshot {
    pub app_loading: bool,
    pub page_loading: HashMap<Page, bool>,
    pub is_content_loading: HashMap<Page, bool>,
    pub active_requests: HashMap<Page, u32>,
    pub request_loading: HashMap<RequestId, bool>,
    pub last_updated: HashMap<Page, DateTime<Utc>>,
}

/// Serializable view of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub page: Page,
    pub page_loading: bool,
    pub is_content_loading: bool,
    pub active_requests: u32,
    pub last_updated: Option<DateTime<Utc>>,
    pub status: PageStatus,
}

// ============================================================================
// Tests
// ============================================================================
