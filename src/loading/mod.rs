//! Loading-state coordination
//!
//! Page-level "is this screen ready" state shared by every data-fetching
//! caller in the client.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   begin / finish   ┌──────────────────────┐
//! │  content callers │ ─────────────────▶ │    RequestTracker    │
//! │  (ContentClient, │                    │  RequestGuard (RAII) │
//! │   PageLoader)    │                    └──────────┬───────────┘
//! └──────────────────┘                               │ start / end
//!                                                    ▼
//! ┌──────────────────┐   reset stuck      ┌──────────────────────┐
//! │ StalenessSweeper │ ─────────────────▶ │     LoadingStore     │
//! │  (tokio interval)│                    │  Arc<RwLock<State>>  │
//! └──────────────────┘                    └──────────┬───────────┘
//!                                                    │ selectors
//!                                                    ▼
//!                                         skeleton / spinner / ready
//! ```
//!
//! # Usage
//!
//! ```
//! use waypoint::loading::{LoadingStore, Page, PageStatus, RequestId};
//!
//! let store = LoadingStore::default();
//! let page = Page::discover();
//!
//! store.start_request(&page, &RequestId::new("r1"), false);
//! assert_eq!(store.page_status(&page), PageStatus::Skeleton);
//!
//! store.end_request(&page, &RequestId::new("r1"), false);
//! assert_eq!(store.page_status(&page), PageStatus::Ready);
//! ```

pub mod clock;
pub mod page;
pub mod state;
pub mod store;
pub mod sweeper;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use page::{Page, RequestId};
pub use state::{LoadingSnapshot, LoadingState, PageSnapshot, PageStatus};
pub use store::{LoadingStore, DEFAULT_STUCK_TIMEOUT_MS};
pub use sweeper::{StalenessSweeper, DEFAULT_SWEEP_INTERVAL_MS};
pub use tracker::{RequestGuard, RequestTracker};
