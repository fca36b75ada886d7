//! Generated POI seed types.
//!
//! This module defines the output types from POI generation. These types are
//! independent of backend domain types to avoid circular dependencies.

use serde::{Deserialize, Serialize};

/// Category codes understood by the backend.
///
/// Mirrors the backend's `PoiCategory` discriminants. Codes are append-only,
/// so new categories must be added at the end.
pub const CATEGORY_CODES: [u8; 5] = [0, 1, 2, 3, 4];

/// A generated example POI record.
///
/// Carries the fields needed to create a POI in the backend. The category is
/// kept as its stable numeric code.
///
/// # Example
///
/// ```
/// use example_data::ExamplePoiSeed;
///
/// let poi = ExamplePoiSeed {
///     name: "Hartmann Museum".to_owned(),
///     latitude: 52.52,
///     longitude: 13.405,
///     category_code: 2,
/// };
///
/// assert_eq!(poi.name, "Hartmann Museum");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePoiSeed {
    /// Human-readable POI name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Stable category code, one of [`CATEGORY_CODES`].
    pub category_code: u8,
}
