//! Driving port for POI search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AreaAndCategory, Error, Poi, PoiId, Position};

/// A single search hit.
///
/// The category is omitted: it is implied by the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoiSearchDataPayload {
    pub id: PoiId,
    pub name: String,
    pub position: Position,
}

impl From<&Poi> for PoiSearchDataPayload {
    fn from(value: &Poi) -> Self {
        Self {
            id: value.id(),
            name: value.name().as_str().to_owned(),
            position: value.position(),
        }
    }
}

/// Ordered collection of search hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoisSearchDataPayload {
    pub pois: Vec<PoiSearchDataPayload>,
}

impl PoisSearchDataPayload {
    /// Append a hit.
    pub fn push_data(&mut self, data: PoiSearchDataPayload) {
        self.pois.push(data);
    }

    /// Number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pois.len()
    }

    /// Whether the search found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

/// Request to search an area for POIs of one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchPoisRequest {
    pub query: AreaAndCategory,
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPoisResponse {
    /// Every matching POI, possibly none.
    Found(PoisSearchDataPayload),
    /// The area holds more matches than the result limit; the client should
    /// narrow the query. No matches are returned.
    RefineQuery,
}

/// Driving port for POI read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiQuery: Send + Sync {
    /// Search the (possibly stale) index for POIs inside an area.
    async fn search_pois(&self, request: SearchPoisRequest) -> Result<SearchPoisResponse, Error>;
}

/// Fixture query implementation returning no matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePoiQuery;

#[async_trait]
impl PoiQuery for FixturePoiQuery {
    async fn search_pois(&self, _request: SearchPoisRequest) -> Result<SearchPoisResponse, Error> {
        Ok(SearchPoisResponse::Found(PoisSearchDataPayload::default()))
    }
}
