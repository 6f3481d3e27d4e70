//! Shared handle to the loading aggregate
//!
//! [`LoadingStore`] is what callers hold. Clones share one
//! [`LoadingState`]; every operation runs to completion under a single
//! write lock, so operations are atomic with respect to each other even on
//! a multi-threaded runtime. The lock is never held across an `.await`.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::clock::{Clock, SystemClock};
use super::page::{Page, RequestId};
use super::state::{LoadingSnapshot, LoadingState, PageSnapshot, PageStatus};
use crate::metrics;

/// Default staleness window before the sweeper force-clears a page
pub const DEFAULT_STUCK_TIMEOUT_MS: i64 = 5000;

/// Cloneable, thread-safe handle to the loading aggregate
#[derive(Debug, Clone)]
pub struct LoadingStore {
    state: Arc<RwLock<LoadingState>>,
    clock: Arc<dyn Clock>,
    stuck_timeout: Duration,
}

impl Default for LoadingStore {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_STUCK_TIMEOUT_MS))
    }
}

impl LoadingStore {
    /// Create a store on the wall clock
    pub fn new(stuck_timeout: Duration) -> Self {
        Self::with_clock(Arc::new(SystemClock), stuck_timeout)
    }

    /// Create a store reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>, stuck_timeout: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(LoadingState::new())),
            clock,
            stuck_timeout,
        }
    }

    pub fn stuck_timeout(&self) -> Duration {
        self.stuck_timeout
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // A panic elsewhere must not wedge the loading indicators, and every
    // transition leaves the aggregate consistent, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, LoadingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LoadingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    pub fn set_app_loading(&self, is_loading: bool) {
        self.write().set_app_loading(is_loading);
        tracing::debug!(is_loading, "App loading flag set");
    }

    pub fn set_page_loading(&self, page: &Page, is_loading: bool) {
        let now = self.now();
        let mut state = self.write();
        state.set_page_loading(page, is_loading, now);
        metrics::update_page_gauges(page.as_str(), state.active_requests(page), is_loading);
        drop(state);

        tracing::debug!(page = %page, is_loading, "Page loading flag overridden");
    }

    pub fn start_request(&self, page: &Page, request_id: &RequestId, content_only: bool) {
        let now = self.now();
        let mut state = self.write();
        state.start_request(page, request_id, content_only, now);
        let active = state.active_requests(page);
        metrics::update_page_gauges(page.as_str(), active, state.is_page_loading(page));
        drop(state);

        metrics::record_request_started(page.as_str(), content_only);
        tracing::debug!(
            page = %page,
            request_id = %request_id,
            content_only,
            active_requests = active,
            "Request started"
        );
    }

    pub fn end_request(&self, page: &Page, request_id: &RequestId, content_only: bool) {
        let now = self.now();
        let mut state = self.write();
        let was_in_flight = state.is_request_loading(request_id);
        state.end_request(page, request_id, content_only, now);
        let active = state.active_requests(page);
        metrics::update_page_gauges(page.as_str(), active, state.is_page_loading(page));
        drop(state);

        if was_in_flight {
            metrics::record_request_ended(page.as_str(), content_only);
            tracing::debug!(
                page = %page,
                request_id = %request_id,
                content_only,
                active_requests = active,
                "Request ended"
            );
        } else {
            tracing::debug!(
                page = %page,
                request_id = %request_id,
                "End for a request that is not in flight"
            );
        }
    }

    /// Force-clear pages stuck loading past the store's timeout
    pub fn reset_stuck_loading_states(&self) -> Vec<Page> {
        let now = self.now();
        let mut state = self.write();
        let reset = state.reset_stuck_loading_states(now, self.stuck_timeout);
        for page in &reset {
            metrics::update_page_gauges(page.as_str(), 0, false);
        }
        drop(state);

        for page in &reset {
            metrics::record_stuck_reset(page.as_str());
        }
        reset
    }

    // ------------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------------

    pub fn is_app_loading(&self) -> bool {
        self.read().is_app_loading()
    }

    pub fn is_page_loading(&self, page: &Page) -> bool {
        self.read().is_page_loading(page)
    }

    pub fn is_content_loading(&self, page: &Page) -> bool {
        self.read().is_content_loading(page)
    }

    pub fn active_requests(&self, page: &Page) -> u32 {
        self.read().active_requests(page)
    }

    pub fn is_request_loading(&self, request_id: &RequestId) -> bool {
        self.read().is_request_loading(request_id)
    }

    pub fn last_updated(&self, page: &Page) -> Option<DateTime<Utc>> {
        self.read().last_updated(page)
    }

    pub fn page_status(&self, page: &Page) -> PageStatus {
        self.read().page_status(page)
    }

    pub fn in_flight(&self) -> usize {
        self.read().in_flight()
    }

    pub fn pages(&self) -> Vec<Page> {
        self.read().pages()
    }

    pub fn snapshot(&self) -> LoadingSnapshot {
        self.read().snapshot()
    }

    pub fn page_snapshot(&self, page: &Page) -> PageSnapshot {
        self.read().page_snapshot(page)
    }
}
