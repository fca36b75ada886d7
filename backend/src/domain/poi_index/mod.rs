//! Lazily built, periodically refreshed spatial-categorical POI index.
//!
//! The index reads the store through cursors only. A single writer (build or
//! refresh, serialised by an async mutex) stages every document of a cycle,
//! applies them to a private working set, and publishes a fresh immutable
//! [`PoiIndexSnapshot`] by swapping an `Arc`. Searches clone the published
//! `Arc` and filter without holding any lock, so they never observe a
//! partially built structure and never wait on store I/O once the first
//! build has completed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{CursorFilter, PoiDocument, PoiStore, PoiStoreError};
use crate::domain::{AreaAndCategory, Poi, PoiId};

mod refresher;
mod snapshot;

pub use refresher::PoiIndexRefresher;
pub use snapshot::PoiIndexSnapshot;

/// Tunables for an index instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiIndexConfig {
    /// Name used in log records.
    pub name: String,
    /// Documents fetched per cursor call.
    pub batch_size: usize,
    /// Delay between background refresh cycles; also the staleness bound.
    pub refresh_period: Duration,
}

impl Default for PoiIndexConfig {
    fn default() -> Self {
        Self {
            name: "poi kdcache".to_owned(),
            batch_size: 128,
            refresh_period: Duration::from_secs(10),
        }
    }
}

/// Observable health of the index writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoiIndexStatus {
    /// Generation of the published snapshot; zero while unbuilt.
    pub generation: u64,
    /// Entries in the published snapshot.
    pub entries: usize,
    /// Latest save time incorporated into the published snapshot.
    pub watermark: Option<DateTime<Utc>>,
    /// When the current snapshot was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Build and refresh cycles that completed.
    pub completed_cycles: u64,
    /// Build and refresh cycles that failed.
    pub failed_cycles: u64,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

impl PoiIndexStatus {
    /// Whether a snapshot has been published.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.generation > 0
    }
}

/// Errors raised by index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoiIndexError {
    /// The store failed while a cycle was reading it.
    #[error(transparent)]
    Store(#[from] PoiStoreError),
    /// Internal index state could not be accessed.
    #[error("poi index state unavailable: {message}")]
    StateUnavailable { message: String },
}

#[derive(Debug, Default)]
struct WorkingSet {
    records: HashMap<PoiId, Poi>,
    watermark: Option<DateTime<Utc>>,
    generation: u64,
}

impl WorkingSet {
    fn apply(&mut self, index_name: &str, document: PoiDocument) {
        self.watermark = Some(
            self.watermark
                .map_or(document.last_saved_at, |seen| seen.max(document.last_saved_at)),
        );
        if document.removed {
            self.records.remove(&document.id);
            return;
        }
        match document.to_poi() {
            Ok(poi) => {
                self.records.insert(poi.id(), poi);
            }
            Err(err) => {
                warn!(
                    index = index_name,
                    poi_id = %document.id,
                    error = %err,
                    "skipping invalid poi document"
                );
                self.records.remove(&document.id);
            }
        }
    }
}

/// Process-wide POI index.
pub struct PoiIndex {
    config: PoiIndexConfig,
    store: Arc<dyn PoiStore>,
    clock: Arc<dyn Clock>,
    published: RwLock<Option<Arc<PoiIndexSnapshot>>>,
    writer: tokio::sync::Mutex<WorkingSet>,
    status: Mutex<PoiIndexStatus>,
}

impl PoiIndex {
    /// Create an unbuilt index over `store`.
    ///
    /// No store access happens until the first search, snapshot request, or
    /// refresh.
    pub fn new(store: Arc<dyn PoiStore>, clock: Arc<dyn Clock>, config: PoiIndexConfig) -> Self {
        Self {
            config,
            store,
            clock,
            published: RwLock::new(None),
            writer: tokio::sync::Mutex::new(WorkingSet::default()),
            status: Mutex::new(PoiIndexStatus::default()),
        }
    }

    /// Index tunables.
    #[must_use]
    pub fn config(&self) -> &PoiIndexConfig {
        &self.config
    }

    /// Currently published snapshot, without triggering a build.
    pub fn current(&self) -> Result<Option<Arc<PoiIndexSnapshot>>, PoiIndexError> {
        let guard = self.published.read().map_err(|_| state_unavailable())?;
        Ok(guard.clone())
    }

    /// Published snapshot, building the index first if it is still unbuilt.
    ///
    /// Concurrent first callers wait for a single build.
    pub async fn snapshot(&self) -> Result<Arc<PoiIndexSnapshot>, PoiIndexError> {
        if let Some(snapshot) = self.current()? {
            return Ok(snapshot);
        }
        let mut working = self.writer.lock().await;
        if let Some(snapshot) = self.current()? {
            return Ok(snapshot);
        }
        self.run_cycle(&mut working).await
    }

    /// Run one refresh cycle, or the initial build if none has completed.
    ///
    /// On failure the previously published snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<PoiIndexSnapshot>, PoiIndexError> {
        let mut working = self.writer.lock().await;
        self.run_cycle(&mut working).await
    }

    /// Return up to `limit` matches for `query` from the published snapshot.
    pub async fn search(
        &self,
        query: &AreaAndCategory,
        limit: usize,
    ) -> Result<Vec<Poi>, PoiIndexError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.search(query, limit))
    }

    /// Writer health counters.
    #[must_use]
    pub fn status(&self) -> PoiIndexStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn run_cycle(
        &self,
        working: &mut WorkingSet,
    ) -> Result<Arc<PoiIndexSnapshot>, PoiIndexError> {
        let published = self.current()?;
        let filter = match (&published, working.watermark) {
            (Some(_), Some(watermark)) => CursorFilter::SavedAfter(watermark),
            _ => CursorFilter::All,
        };

        let documents = match self.fetch(filter).await {
            Ok(documents) => documents,
            Err(err) => {
                error!(
                    index = %self.config.name,
                    building = published.is_none(),
                    error = %err,
                    "poi index cycle failed; keeping previous snapshot"
                );
                self.record_failure(&err);
                return Err(err);
            }
        };

        if let Some(snapshot) = published.as_ref().filter(|_| documents.is_empty()) {
            debug!(index = %self.config.name, "poi index refresh found no changes");
            self.record_unchanged();
            return Ok(Arc::clone(snapshot));
        }

        if published.is_none() {
            working.records.clear();
        }
        let changed = documents.len();
        for document in documents {
            working.apply(&self.config.name, document);
        }
        working.generation += 1;
        let snapshot = Arc::new(PoiIndexSnapshot::from_records(
            &working.records,
            working.watermark,
            self.clock.utc(),
            working.generation,
        ));
        self.publish(Arc::clone(&snapshot))?;

        info!(
            index = %self.config.name,
            generation = snapshot.generation(),
            entries = snapshot.len(),
            changed,
            watermark = ?snapshot.watermark(),
            "poi index published"
        );
        Ok(snapshot)
    }

    async fn fetch(&self, filter: CursorFilter) -> Result<Vec<PoiDocument>, PoiIndexError> {
        let batch_size = self.config.batch_size.max(1);
        let mut cursor = self.store.open_cursor(filter).await?;
        let mut documents = Vec::new();
        loop {
            let batch = cursor.next_batch(batch_size).await?;
            if batch.is_empty() {
                break;
            }
            debug!(index = %self.config.name, fetched = batch.len(), "poi index batch");
            documents.extend(batch);
        }
        Ok(documents)
    }

    fn publish(&self, snapshot: Arc<PoiIndexSnapshot>) -> Result<(), PoiIndexError> {
        {
            let mut published = self.published.write().map_err(|_| state_unavailable())?;
            *published = Some(Arc::clone(&snapshot));
        }

        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        status.generation = snapshot.generation();
        status.entries = snapshot.len();
        status.watermark = snapshot.watermark();
        status.published_at = Some(snapshot.built_at());
        status.completed_cycles += 1;
        status.last_error = None;
        Ok(())
    }

    fn record_unchanged(&self) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        status.completed_cycles += 1;
        status.last_error = None;
    }

    fn record_failure(&self, err: &PoiIndexError) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        status.failed_cycles += 1;
        status.last_error = Some(err.to_string());
    }
}

fn state_unavailable() -> PoiIndexError {
    PoiIndexError::StateUnavailable {
        message: "published snapshot lock poisoned".to_owned(),
    }
}
