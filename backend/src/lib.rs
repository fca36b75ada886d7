//! POI catalogue backend library.
//!
//! Points of interest are written to a document store and served from a
//! lazily built, periodically refreshed in-memory index.

pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::RequestLog;
