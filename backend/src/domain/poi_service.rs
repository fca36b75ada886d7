//! POI catalogue domain services.
//!
//! [`PoiCommandService`] writes through the store inside a unit of work and
//! never touches the index. [`PoiQueryService`] reads the index only and
//! never opens a unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::poi_index::{PoiIndex, PoiIndexError};
use crate::domain::ports::{
    CreatePoiRequest, CreatePoiResponse, DeletePoiRequest, PoiCommand, PoiQuery,
    PoiSearchDataPayload, PoiStore, PoiStoreError, PoisSearchDataPayload, SearchPoisRequest,
    SearchPoisResponse,
};
use crate::domain::{Error, PoiDraft, PoiId, SEARCH_LIMIT, within_unit_of_work};

fn map_store_error(error: PoiStoreError) -> Error {
    match error {
        PoiStoreError::Connection { message } => {
            Error::service_unavailable(format!("poi store unavailable: {message}"))
        }
        PoiStoreError::Query { message } => Error::internal(format!("poi store error: {message}")),
    }
}

fn map_index_error(error: PoiIndexError) -> Error {
    match error {
        PoiIndexError::Store(error) => map_store_error(error),
        PoiIndexError::StateUnavailable { message } => Error::internal(message),
    }
}

fn poi_not_found(id: PoiId) -> Error {
    Error::not_found(format!("poi {id} does not exist"))
        .with_details(json!({ "id": id.to_string(), "code": "poi_not_found" }))
}

/// Failure raised inside a command unit of work.
#[derive(Debug)]
enum CommandFailure {
    Store(PoiStoreError),
    Domain(Error),
}

impl From<PoiStoreError> for CommandFailure {
    fn from(value: PoiStoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CommandFailure> for Error {
    fn from(value: CommandFailure) -> Self {
        match value {
            CommandFailure::Store(error) => map_store_error(error),
            CommandFailure::Domain(error) => error,
        }
    }
}

/// POI service implementing the command driving port.
pub struct PoiCommandService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> PoiCommandService<S> {
    /// Create a command service writing to `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for PoiCommandService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S> PoiCommand for PoiCommandService<S>
where
    S: PoiStore + ?Sized,
{
    async fn create_poi(&self, request: CreatePoiRequest) -> Result<CreatePoiResponse, Error> {
        let draft = PoiDraft::try_from(request.poi)?;

        let id = within_unit_of_work(self.store.as_ref(), |uow| {
            Box::pin(async move { uow.create(&draft).await })
        })
        .await
        .map_err(map_store_error)?;

        info!(poi_id = %id, "poi created");
        Ok(CreatePoiResponse { id })
    }

    async fn delete_poi(&self, request: DeletePoiRequest) -> Result<(), Error> {
        let id = request.id;

        within_unit_of_work(self.store.as_ref(), |uow| {
            Box::pin(async move {
                if uow.get(&id).await?.is_none() {
                    return Err(CommandFailure::Domain(poi_not_found(id)));
                }
                uow.mark_removed(&id).await?;
                Ok(())
            })
        })
        .await
        .map_err(Error::from)?;

        info!(poi_id = %id, "poi marked for removal");
        Ok(())
    }
}

/// POI service implementing the query driving port.
#[derive(Clone)]
pub struct PoiQueryService {
    index: Arc<PoiIndex>,
}

impl PoiQueryService {
    /// Create a query service reading from `index`.
    pub fn new(index: Arc<PoiIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl PoiQuery for PoiQueryService {
    async fn search_pois(&self, request: SearchPoisRequest) -> Result<SearchPoisResponse, Error> {
        let matches = self
            .index
            .search(&request.query, SEARCH_LIMIT)
            .await
            .map_err(map_index_error)?;

        if matches.len() >= SEARCH_LIMIT {
            return Ok(SearchPoisResponse::RefineQuery);
        }

        let mut payload = PoisSearchDataPayload::default();
        for poi in &matches {
            payload.push_data(PoiSearchDataPayload::from(poi));
        }
        Ok(SearchPoisResponse::Found(payload))
    }
}

#[cfg(test)]
#[path = "poi_service_tests.rs"]
mod tests;
