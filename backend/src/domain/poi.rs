//! Point-of-interest aggregate and its value objects.
//!
//! Purpose: represent the catalogue entity persisted by the store and
//! projected into the in-memory index. Category codes are part of the stored
//! document format, so they are explicit and append-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length, in characters, of a POI name.
pub const POI_NAME_MAX: usize = 128;

/// Validation errors raised by POI value objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoiValidationError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude must be a finite value in [-90, 90], got {value}")]
    InvalidLatitude { value: f64 },
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude must be a finite value in [-180, 180], got {value}")]
    InvalidLongitude { value: f64 },
    /// Name empty once trimmed.
    #[error("poi name must not be empty")]
    EmptyName,
    /// Name longer than [`POI_NAME_MAX`].
    #[error("poi name must be at most {max} characters, got {length}")]
    NameTooLong { length: usize, max: usize },
    /// Stored category code with no matching tag.
    #[error("unknown poi category code {code}")]
    UnknownCategoryCode { code: u8 },
    /// Category tag with no matching variant.
    #[error("unknown poi category '{value}'")]
    UnknownCategory { value: String },
    /// Identifier text is not a UUID.
    #[error("invalid poi identifier '{value}'")]
    InvalidId { value: String },
}

/// Durable identifier assigned by the store when a POI is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PoiId(Uuid);

impl PoiId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PoiId {
    type Err = PoiValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| PoiValidationError::InvalidId {
                value: value.to_owned(),
            })
    }
}

/// Validated WGS84 position.
///
/// `Position` is `Copy`: every projection of a POI receives its own value,
/// never a handle onto the record's position.
///
/// # Examples
/// ```
/// use poi_backend::domain::Position;
///
/// let eiffel = Position::new(48.8584, 2.2945)?;
/// assert_eq!(eiffel.latitude(), 48.8584);
/// assert!(Position::new(91.0, 0.0).is_err());
/// # Ok::<(), poi_backend::domain::PoiValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "PositionDto", into = "PositionDto")]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    /// Create a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PoiValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PoiValidationError::InvalidLatitude { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PoiValidationError::InvalidLongitude { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionDto {
    latitude: f64,
    longitude: f64,
}

impl From<Position> for PositionDto {
    fn from(value: Position) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl TryFrom<PositionDto> for Position {
    type Error = PoiValidationError;

    fn try_from(value: PositionDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

/// POI category with stable numeric codes.
///
/// Codes are persisted in store documents. New tags take the next unused
/// code; existing codes are never renumbered or reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PoiCategory {
    /// Electric vehicle charging point.
    EvCharging = 0,
    /// Landmark or monument.
    Landmark = 1,
    /// Museum or gallery.
    Museum = 2,
    /// Restaurant or café.
    Restaurant = 3,
    /// Shop or shopping centre.
    Shopping = 4,
}

impl PoiCategory {
    /// Every category, in code order.
    pub const ALL: [Self; 5] = [
        Self::EvCharging,
        Self::Landmark,
        Self::Museum,
        Self::Restaurant,
        Self::Shopping,
    ];

    /// Stable numeric code stored in documents.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Snake-case tag used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EvCharging => "ev_charging",
            Self::Landmark => "landmark",
            Self::Museum => "museum",
            Self::Restaurant => "restaurant",
            Self::Shopping => "shopping",
        }
    }
}

impl TryFrom<u8> for PoiCategory {
    type Error = PoiValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or(PoiValidationError::UnknownCategoryCode { code })
    }
}

impl FromStr for PoiCategory {
    type Err = PoiValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| PoiValidationError::UnknownCategory {
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated POI name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct PoiName(String);

impl PoiName {
    /// Create a name, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, PoiValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PoiValidationError::EmptyName);
        }
        let length = trimmed.chars().count();
        if length > POI_NAME_MAX {
            return Err(PoiValidationError::NameTooLong {
                length,
                max: POI_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PoiName {
    type Error = PoiValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PoiName> for String {
    fn from(value: PoiName) -> Self {
        value.0
    }
}

impl fmt::Display for PoiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields required to create a POI; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDraft {
    pub name: PoiName,
    pub position: Position,
    pub category: PoiCategory,
}

/// Persisted point of interest.
///
/// ## Invariants
/// - `position` is always present; a POI cannot exist without one.
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    id: PoiId,
    name: PoiName,
    position: Position,
    category: PoiCategory,
}

impl Poi {
    /// Assemble a POI from a draft and the identifier assigned by the store.
    #[must_use]
    pub fn from_draft(id: PoiId, draft: PoiDraft) -> Self {
        let PoiDraft {
            name,
            position,
            category,
        } = draft;
        Self {
            id,
            name,
            position,
            category,
        }
    }

    /// Durable identifier.
    #[must_use]
    pub const fn id(&self) -> PoiId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &PoiName {
        &self.name
    }

    /// Position owned by this record.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Category tag.
    #[must_use]
    pub const fn category(&self) -> PoiCategory {
        self.category
    }

    /// Latitude key extracted for the index.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.position.latitude()
    }

    /// Longitude key extracted for the index.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.position.longitude()
    }
}
