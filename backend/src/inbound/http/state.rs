//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{FixturePoiCommand, FixturePoiQuery, PoiCommand, PoiQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub pois: Arc<dyn PoiCommand>,
    pub pois_query: Arc<dyn PoiQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(pois: Arc<dyn PoiCommand>, pois_query: Arc<dyn PoiQuery>) -> Self {
        Self { pois, pois_query }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixturePoiCommand), Arc::new(FixturePoiQuery))
    }
}
