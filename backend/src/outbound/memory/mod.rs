//! Process-local POI store.
//!
//! Implements [`PoiStore`] over a map guarded by a `std::sync::RwLock`.
//! Commits stamp every staged change with a strictly increasing
//! `last_saved_at` while holding the write lock, so a cursor opened later
//! with `SavedAfter(t)` observes every change committed after `t`. Removal
//! keeps a tombstone document so incremental cursors can report it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    CursorFilter, PoiCursor, PoiDocument, PoiStore, PoiStoreError, PoiUnitOfWork,
};
use crate::domain::{PoiDraft, PoiId};

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<PoiId, PoiDocument>,
    last_stamp: Option<DateTime<Utc>>,
    failing_cursor_fetches: usize,
    fail_next_commit: bool,
}

impl StoreState {
    fn next_stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn live(&self, id: &PoiId) -> Option<&PoiDocument> {
        self.documents.get(id).filter(|document| !document.removed)
    }
}

type SharedState = Arc<RwLock<StoreState>>;

fn read_state(state: &SharedState) -> Result<RwLockReadGuard<'_, StoreState>, PoiStoreError> {
    state
        .read()
        .map_err(|_| PoiStoreError::query("poi store state poisoned"))
}

fn write_state(state: &SharedState) -> Result<RwLockWriteGuard<'_, StoreState>, PoiStoreError> {
    state
        .write()
        .map_err(|_| PoiStoreError::query("poi store state poisoned"))
}

/// In-memory POI document collection.
#[derive(Clone)]
pub struct InMemoryPoiStore {
    state: SharedState,
    clock: Arc<dyn Clock>,
}

impl InMemoryPoiStore {
    /// Create an empty store stamping saves with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            clock,
        }
    }

    /// Number of stored documents, tombstones included.
    pub fn len(&self) -> Result<usize, PoiStoreError> {
        Ok(read_state(&self.state)?.documents.len())
    }

    /// Whether the store holds no documents at all.
    pub fn is_empty(&self) -> Result<bool, PoiStoreError> {
        Ok(self.len()? == 0)
    }

    /// Number of documents not marked for removal.
    pub fn live_count(&self) -> Result<usize, PoiStoreError> {
        let state = read_state(&self.state)?;
        Ok(state
            .documents
            .values()
            .filter(|document| !document.removed)
            .count())
    }

    /// Make the next `count` cursor fetches fail with a connection error.
    pub fn fail_next_cursor_fetches(&self, count: usize) -> Result<(), PoiStoreError> {
        write_state(&self.state)?.failing_cursor_fetches = count;
        Ok(())
    }

    /// Make the next commit fail with a query error.
    pub fn fail_next_commit(&self) -> Result<(), PoiStoreError> {
        write_state(&self.state)?.fail_next_commit = true;
        Ok(())
    }
}

#[async_trait]
impl PoiStore for InMemoryPoiStore {
    async fn open_cursor(
        &self,
        filter: CursorFilter,
    ) -> Result<Box<dyn PoiCursor>, PoiStoreError> {
        let state = read_state(&self.state)?;
        let mut documents: Vec<PoiDocument> = state
            .documents
            .values()
            .filter(|document| filter.admits(document.last_saved_at))
            .cloned()
            .collect();
        documents.sort_by_key(|document| (document.last_saved_at, document.id));
        debug!(?filter, matched = documents.len(), "opened poi cursor");
        Ok(Box::new(InMemoryCursor {
            state: Arc::clone(&self.state),
            pending: documents.into(),
        }))
    }

    async fn begin_unit_of_work(&self) -> Result<Box<dyn PoiUnitOfWork>, PoiStoreError> {
        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
            staged: Vec::new(),
        }))
    }
}

struct InMemoryCursor {
    state: SharedState,
    pending: VecDeque<PoiDocument>,
}

#[async_trait]
impl PoiCursor for InMemoryCursor {
    async fn next_batch(&mut self, max: usize) -> Result<Vec<PoiDocument>, PoiStoreError> {
        {
            let mut state = write_state(&self.state)?;
            if state.failing_cursor_fetches > 0 {
                state.failing_cursor_fetches -= 1;
                return Err(PoiStoreError::connection("injected cursor fetch failure"));
            }
        }
        let take = max.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }
}

#[derive(Debug, Clone)]
enum StagedChange {
    Create { id: PoiId, draft: PoiDraft },
    Remove { id: PoiId },
}

struct InMemoryUnitOfWork {
    state: SharedState,
    clock: Arc<dyn Clock>,
    staged: Vec<StagedChange>,
}

impl InMemoryUnitOfWork {
    fn staged_view(&self, id: &PoiId) -> Option<Option<PoiDocument>> {
        self.staged.iter().rev().find_map(|change| match change {
            StagedChange::Create { id: created, draft } if created == id => {
                Some(Some(document_from(*created, draft, self.clock.utc(), false)))
            }
            StagedChange::Remove { id: removed } if removed == id => Some(None),
            _ => None,
        })
    }
}

fn document_from(
    id: PoiId,
    draft: &PoiDraft,
    saved_at: DateTime<Utc>,
    removed: bool,
) -> PoiDocument {
    PoiDocument {
        id,
        name: draft.name.as_str().to_owned(),
        latitude: draft.position.latitude(),
        longitude: draft.position.longitude(),
        category_code: draft.category.code(),
        last_saved_at: saved_at,
        removed,
    }
}

#[async_trait]
impl PoiUnitOfWork for InMemoryUnitOfWork {
    async fn create(&mut self, draft: &PoiDraft) -> Result<PoiId, PoiStoreError> {
        let id = PoiId::random();
        self.staged.push(StagedChange::Create {
            id,
            draft: draft.clone(),
        });
        Ok(id)
    }

    async fn get(&mut self, id: &PoiId) -> Result<Option<PoiDocument>, PoiStoreError> {
        if let Some(view) = self.staged_view(id) {
            return Ok(view);
        }
        Ok(read_state(&self.state)?.live(id).cloned())
    }

    async fn mark_removed(&mut self, id: &PoiId) -> Result<(), PoiStoreError> {
        let exists = match self.staged_view(id) {
            Some(view) => view.is_some(),
            None => read_state(&self.state)?.live(id).is_some(),
        };
        if !exists {
            return Err(PoiStoreError::query(format!("poi {id} is not stored")));
        }
        self.staged.push(StagedChange::Remove { id: *id });
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), PoiStoreError> {
        let mut state = write_state(&self.state)?;
        if state.fail_next_commit {
            state.fail_next_commit = false;
            return Err(PoiStoreError::query("injected commit failure"));
        }
        let applied = self.staged.len();
        for change in self.staged.drain(..) {
            let stamp = state.next_stamp(self.clock.utc());
            match change {
                StagedChange::Create { id, draft } => {
                    state
                        .documents
                        .insert(id, document_from(id, &draft, stamp, false));
                }
                StagedChange::Remove { id } => {
                    if let Some(document) = state.documents.get_mut(&id) {
                        document.removed = true;
                        document.last_saved_at = stamp;
                    }
                }
            }
        }
        debug!(applied, "committed poi unit of work");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), PoiStoreError> {
        self.staged.clear();
        Ok(())
    }
}
