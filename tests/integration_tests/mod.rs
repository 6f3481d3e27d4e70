//! Integration tests module
//!
//! End-to-end tests wiring the content client, page loaders and monitor to
//! a real loading store, with the REST API mocked by wiremock.

pub mod content_test;
pub mod fixtures;
pub mod monitor_test;
