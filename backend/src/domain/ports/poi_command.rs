//! Driving port for POI mutations.
//!
//! Creations and deletions go to the store only. The search index observes
//! them on its next refresh cycle, so callers must tolerate eventual
//! visibility.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, PoiCategory, PoiDraft, PoiId, PoiName, Position};

/// Payload accepted when creating a POI.
///
/// `position` is optional on the wire so that its absence can be reported as
/// a domain error rather than a deserialisation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoiCreatePayload {
    pub name: String,
    #[serde(default, rename = "position")]
    pub position: Option<Position>,
    pub category: PoiCategory,
}

impl TryFrom<PoiCreatePayload> for PoiDraft {
    type Error = Error;

    fn try_from(value: PoiCreatePayload) -> Result<Self, Self::Error> {
        let position = value.position.ok_or_else(position_missing)?;
        let name = PoiName::new(value.name).map_err(|err| {
            Error::invalid_request(format!("invalid poi name: {err}"))
                .with_details(json!({ "field": "name", "code": "invalid_name" }))
        })?;
        Ok(Self {
            name,
            position,
            category: value.category,
        })
    }
}

/// Validation error raised when a creation request carries no position.
#[must_use]
pub fn position_missing() -> Error {
    Error::invalid_request("Position is missing.")
        .with_details(json!({ "field": "position", "code": "position_missing" }))
}

/// Request to create a POI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoiRequest {
    pub poi: PoiCreatePayload,
}

/// Response carrying the identifier assigned to a new POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoiResponse {
    pub id: PoiId,
}

/// Request to delete a POI by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePoiRequest {
    pub id: PoiId,
}

/// Driving port for POI write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiCommand: Send + Sync {
    /// Persist a new POI and return its store-assigned identifier.
    ///
    /// Fails with [`crate::domain::ErrorCode::InvalidRequest`] before any
    /// store interaction when the position is missing.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use poi_backend::domain::{PoiCategory, Position};
    /// # use poi_backend::domain::ports::{CreatePoiRequest, FixturePoiCommand, PoiCommand, PoiCreatePayload};
    /// # async fn example() -> Result<(), poi_backend::domain::Error> {
    /// let command = FixturePoiCommand;
    /// let response = command
    ///     .create_poi(CreatePoiRequest {
    ///         poi: PoiCreatePayload {
    ///             name: "Louvre".to_owned(),
    ///             position: Some(Position::new(48.8606, 2.3376).expect("valid position")),
    ///             category: PoiCategory::Museum,
    ///         },
    ///     })
    ///     .await?;
    /// println!("created {}", response.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create_poi(&self, request: CreatePoiRequest) -> Result<CreatePoiResponse, Error>;

    /// Mark a POI for removal.
    ///
    /// Fails with [`crate::domain::ErrorCode::NotFound`] when no live POI has
    /// the identifier.
    async fn delete_poi(&self, request: DeletePoiRequest) -> Result<(), Error>;
}

/// Fixture command implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePoiCommand;

#[async_trait]
impl PoiCommand for FixturePoiCommand {
    async fn create_poi(&self, request: CreatePoiRequest) -> Result<CreatePoiResponse, Error> {
        PoiDraft::try_from(request.poi)?;
        Ok(CreatePoiResponse {
            id: PoiId::random(),
        })
    }

    async fn delete_poi(&self, _request: DeletePoiRequest) -> Result<(), Error> {
        Ok(())
    }
}
