//! Request tracking for data-fetching callers
//!
//! Every call that should affect a page's loading state goes through a
//! [`RequestGuard`]. Starting a guard announces the request; the guard ends
//! it exactly once, on [`RequestGuard::finish`] or on drop. Drop covers the
//! early-return, `?`, panic and cancelled-future paths, so a caller cannot
//! forget the end call.
//!
//! ```
//! use waypoint::loading::{LoadingStore, Page, RequestTracker};
//!
//! let store = LoadingStore::default();
//! let tracker = RequestTracker::new(store.clone());
//!
//! let guard = tracker.begin(Page::discover(), false);
//! assert!(store.is_page_loading(&Page::discover()));
//!
//! drop(guard);
//! assert!(!store.is_page_loading(&Page::discover()));
//! ```

use std::future::Future;

use super::page::{Page, RequestId};
use super::store::LoadingStore;

// ============================================================================
// Request Tracker
// ============================================================================

/// Issues request guards against one store
#[derive(Debug, Clone)]
pub struct RequestTracker {
    store: LoadingStore,
}

impl RequestTracker {
    pub fn new(store: LoadingStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LoadingStore {
        &self.store
    }

    /// Start a request with a freshly generated id
    pub fn begin(&self, page: Page, content_only: bool) -> RequestGuard {
        self.begin_with_id(page, RequestId::generate(), content_only)
    }

    /// Start a request under an id the caller already owns
    ///
    /// The id must not be in flight already; reusing one merges two
    /// requests into a single `request_loading` entry.
    pub fn begin_with_id(&self, page: Page, request_id: RequestId, content_only: bool) -> RequestGuard {
        self.store.start_request(&page, &request_id, content_only);
        RequestGuard {
            store: self.store.clone(),
            page,
            request_id,
            content_only,
            ended: false,
        }
    }

    /// Run `fut` as a tracked request
    ///
    /// The request ends when `fut` completes, or when the returned future is
    /// dropped before that.
    pub async fn track<F>(&self, page: Page, content_only: bool, fut: F) -> F::Output
    where
        F: Future,
    {
        let guard = self.begin(page, content_only);
        let output = fut.await;
        guard.finish();
        output
    }
}

// ============================================================================
// Request Guard
// ============================================================================

/// Scoped in-flight request
///
/// Holds the page, id and `content_only` value used at start so the end
/// call always matches.
#[must_use = "dropping the guard immediately ends the request"]
#[derive(Debug)]
pub struct RequestGuard {
    store: LoadingStore,
    page: Page,
    request_id: RequestId,
    content_only: bool,
    ended: bool,
}

impl RequestGuard {
    pub fn id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn is_content_only(&self) -> bool {
        self.content_only
    }

    /// End the request now
    pub fn finish(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.store
            .end_request(&self.page, &self.request_id, self.content_only);
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.end();
    }
}

// ============================================================================
// Tests
// ============================================================================
