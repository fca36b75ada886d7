//! Shared wiring for backend integration tests.
//!
//! Each integration test compiles as its own crate, so helpers that are only
//! used by some of them are allowed to go unused.

#![allow(dead_code, reason = "not every test crate uses every helper")]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockable::Clock;
use poi_backend::domain::ports::{
    CreatePoiRequest, DeletePoiRequest, PoiCommand, PoiCreatePayload, PoiQuery, PoiStore,
    SearchPoisRequest, SearchPoisResponse,
};
use poi_backend::domain::{
    AreaAndCategory, Error, PoiCategory, PoiCommandService, PoiId, PoiIndex, PoiIndexConfig,
    PoiQueryService, Position,
};
use poi_backend::outbound::memory::InMemoryPoiStore;
use poi_backend::test_support::MutableClock;

/// Store, index, and both services wired the way `main` wires them.
pub struct Catalogue {
    pub store: InMemoryPoiStore,
    pub clock: Arc<MutableClock>,
    pub index: Arc<PoiIndex>,
    pub commands: Arc<PoiCommandService<dyn PoiStore>>,
    pub queries: Arc<PoiQueryService>,
}

impl Catalogue {
    /// Wire a catalogue with a frozen clock and small cursor batches.
    pub fn new() -> Self {
        Self::with_config(PoiIndexConfig {
            name: "integration cache".to_owned(),
            batch_size: 16,
            refresh_period: Duration::from_secs(10),
        })
    }

    pub fn with_config(config: PoiIndexConfig) -> Self {
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
                .single()
                .expect("valid start time"),
        ));
        let store = InMemoryPoiStore::new(Arc::clone(&clock) as Arc<dyn Clock>);
        let shared: Arc<dyn PoiStore> = Arc::new(store.clone());
        let index = Arc::new(PoiIndex::new(
            Arc::clone(&shared),
            Arc::clone(&clock) as Arc<dyn Clock>,
            config,
        ));
        Self {
            store,
            clock,
            commands: Arc::new(PoiCommandService::new(shared)),
            queries: Arc::new(PoiQueryService::new(Arc::clone(&index))),
            index,
        }
    }

    pub async fn try_create(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: PoiCategory,
    ) -> Result<PoiId, Error> {
        let response = self
            .commands
            .create_poi(CreatePoiRequest {
                poi: PoiCreatePayload {
                    name: name.to_owned(),
                    position: Some(Position::new(latitude, longitude).expect("valid position")),
                    category,
                },
            })
            .await?;
        Ok(response.id)
    }

    pub async fn create(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: PoiCategory,
    ) -> PoiId {
        self.clock.advance_seconds(1);
        self.try_create(name, latitude, longitude, category)
            .await
            .expect("create succeeds")
    }

    pub async fn delete(&self, id: PoiId) -> Result<(), Error> {
        self.commands.delete_poi(DeletePoiRequest { id }).await
    }

    pub async fn search(&self, query: AreaAndCategory) -> Result<SearchPoisResponse, Error> {
        self.queries.search_pois(SearchPoisRequest { query }).await
    }

    /// Search and return the matching identifiers, failing on a refine reply.
    pub async fn found_ids(&self, query: AreaAndCategory) -> Vec<PoiId> {
        match self.search(query).await.expect("search succeeds") {
            SearchPoisResponse::Found(payload) => {
                let mut ids: Vec<PoiId> = payload.pois.iter().map(|poi| poi.id).collect();
                ids.sort_by_key(|id| *id.as_uuid());
                ids
            }
            SearchPoisResponse::RefineQuery => panic!("expected matches, got a refine reply"),
        }
    }

    pub async fn refresh(&self) {
        self.clock.advance_seconds(10);
        self.index.refresh().await.expect("refresh succeeds");
    }
}

/// Query covering `[lat, lat + span] x [lon, lon + span]`.
pub fn area(latitude: f64, longitude: f64, span: f64, category: PoiCategory) -> AreaAndCategory {
    AreaAndCategory::new(latitude, latitude + span, longitude, longitude + span, category)
        .expect("valid area")
}
