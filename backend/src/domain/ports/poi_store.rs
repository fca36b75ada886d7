//! Driven port for the durable POI document store.
//!
//! The store exposes two channels: forward-only cursors over the POI
//! collection (used by the in-memory index to build and refresh itself) and
//! units of work that group mutations into all-or-nothing commits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::{Poi, PoiCategory, PoiDraft, PoiId, PoiName, PoiValidationError, Position};

/// Stored POI document as yielded by cursors and unit-of-work reads.
///
/// Documents carry raw field values; [`PoiDocument::to_poi`] re-validates
/// them so that a document written by another revision of the schema (for
/// instance an unknown category code) is reported instead of indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDocument {
    pub id: PoiId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_code: u8,
    /// Commit time of the last save; drives incremental cursors.
    pub last_saved_at: DateTime<Utc>,
    /// Tombstone flag set once the document has been marked for removal.
    pub removed: bool,
}

impl PoiDocument {
    /// Rebuild the domain record held by this document.
    pub fn to_poi(&self) -> Result<Poi, PoiValidationError> {
        let draft = PoiDraft {
            name: PoiName::new(self.name.clone())?,
            position: Position::new(self.latitude, self.longitude)?,
            category: PoiCategory::try_from(self.category_code)?,
        };
        Ok(Poi::from_draft(self.id, draft))
    }
}

/// Restriction applied when opening a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorFilter {
    /// Every document, tombstones included.
    All,
    /// Documents whose last save is strictly after the given instant.
    SavedAfter(DateTime<Utc>),
}

impl CursorFilter {
    /// Whether a document saved at `saved_at` passes the filter.
    #[must_use]
    pub fn admits(&self, saved_at: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::SavedAfter(watermark) => saved_at > *watermark,
        }
    }
}

define_port_error! {
    /// Errors raised by store adapters.
    pub enum PoiStoreError {
        /// Store connection could not be established or was lost.
        Connection => "poi store connection failed",
        /// Read, write, or commit failed during execution.
        Query => "poi store query failed",
    }
}

/// Forward-only cursor over the POI collection.
///
/// Documents are yielded in ascending `last_saved_at` order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiCursor: Send {
    /// Fetch up to `max` documents. An empty batch means the cursor is
    /// exhausted.
    async fn next_batch(&mut self, max: usize) -> Result<Vec<PoiDocument>, PoiStoreError>;
}

/// Scoped group of store mutations.
///
/// Mutations stay staged until [`PoiUnitOfWork::commit`] succeeds. Calling
/// [`PoiUnitOfWork::rollback`], or dropping the unit of work without
/// committing, discards them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiUnitOfWork: Send {
    /// Stage creation of a POI and return the identifier it will carry.
    async fn create(&mut self, draft: &PoiDraft) -> Result<PoiId, PoiStoreError>;

    /// Read a live document, observing mutations staged in this unit of
    /// work. Tombstoned documents read as absent.
    async fn get(&mut self, id: &PoiId) -> Result<Option<PoiDocument>, PoiStoreError>;

    /// Stage removal of an existing document.
    async fn mark_removed(&mut self, id: &PoiId) -> Result<(), PoiStoreError>;

    /// Apply every staged mutation atomically.
    async fn commit(&mut self) -> Result<(), PoiStoreError>;

    /// Discard every staged mutation.
    async fn rollback(&mut self) -> Result<(), PoiStoreError>;
}

/// Port for the durable POI collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiStore: Send + Sync {
    /// Open a cursor over the collection, ordered by last save time.
    async fn open_cursor(&self, filter: CursorFilter)
    -> Result<Box<dyn PoiCursor>, PoiStoreError>;

    /// Begin a unit of work.
    async fn begin_unit_of_work(&self) -> Result<Box<dyn PoiUnitOfWork>, PoiStoreError>;
}
