pub mod fetch;
pub mod serve;

// Re-export command functions for convenience
pub use fetch::{fetch, load_page, FetchParams};
pub use serve::serve;
