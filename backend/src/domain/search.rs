//! Search vocabulary shared by the query service and the in-memory index.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::poi::PoiCategory;

/// Maximum number of POIs returned to a client for a single search.
pub const SEARCH_RESULT_LIMIT: usize = 100;

/// Number of matches requested from the index. One more than the result
/// limit so that "too many" is observable without a separate count.
pub const SEARCH_LIMIT: usize = SEARCH_RESULT_LIMIT + 1;

/// Errors raised when building search intervals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchValidationError {
    /// Lower bound exceeds the upper bound.
    #[error("{field} interval is inverted: {low} > {high}")]
    InvertedInterval {
        field: &'static str,
        low: f64,
        high: f64,
    },
    /// A bound is NaN or infinite.
    #[error("{field} interval bound must be finite, got {value}")]
    NonFiniteBound { field: &'static str, value: f64 },
}

/// Closed interval `[low, high]` over an ordered key.
///
/// # Examples
/// ```
/// use poi_backend::domain::ClosedInterval;
///
/// let band = ClosedInterval::new(10.0, 20.0).expect("ordered bounds");
/// assert!(band.contains(&10.0));
/// assert!(band.contains(&20.0));
/// assert!(!band.contains(&20.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedInterval<T> {
    low: T,
    high: T,
}

impl<T: PartialOrd + Copy> ClosedInterval<T> {
    /// Build an interval, returning `None` when `low > high` or the bounds
    /// are unordered (NaN).
    pub fn new(low: T, high: T) -> Option<Self> {
        match low.partial_cmp(&high) {
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal) => Some(Self { low, high }),
            _ => None,
        }
    }

    /// Degenerate interval holding a single value.
    pub const fn singleton(value: T) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    /// Inclusive lower bound.
    pub const fn low(&self) -> T {
        self.low
    }

    /// Inclusive upper bound.
    pub const fn high(&self) -> T {
        self.high
    }

    /// Whether `value` lies within the interval, bounds included.
    pub fn contains(&self, value: &T) -> bool {
        self.low <= *value && *value <= self.high
    }
}

/// Rectangular latitude/longitude area plus the category to match.
///
/// The category is treated as a singleton interval so all three index
/// dimensions share the same range logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaAndCategory {
    latitude: ClosedInterval<f64>,
    longitude: ClosedInterval<f64>,
    category: PoiCategory,
}

impl AreaAndCategory {
    /// Validate and assemble a search query.
    ///
    /// # Examples
    /// ```
    /// use poi_backend::domain::{AreaAndCategory, PoiCategory};
    ///
    /// let query = AreaAndCategory::new(48.8, 48.9, 2.2, 2.4, PoiCategory::Museum)?;
    /// assert!(query.latitude().contains(&48.86));
    /// # Ok::<(), poi_backend::domain::SearchValidationError>(())
    /// ```
    pub fn new(
        latitude_min: f64,
        latitude_max: f64,
        longitude_min: f64,
        longitude_max: f64,
        category: PoiCategory,
    ) -> Result<Self, SearchValidationError> {
        let latitude = bounded_interval("latitude", latitude_min, latitude_max)?;
        let longitude = bounded_interval("longitude", longitude_min, longitude_max)?;
        Ok(Self {
            latitude,
            longitude,
            category,
        })
    }

    /// Latitude band.
    #[must_use]
    pub const fn latitude(&self) -> ClosedInterval<f64> {
        self.latitude
    }

    /// Longitude band.
    #[must_use]
    pub const fn longitude(&self) -> ClosedInterval<f64> {
        self.longitude
    }

    /// Category as a degenerate interval.
    #[must_use]
    pub const fn category(&self) -> ClosedInterval<PoiCategory> {
        ClosedInterval::singleton(self.category)
    }

    /// Whether the three predicates hold for the given keys.
    #[must_use]
    pub fn matches(&self, latitude: f64, longitude: f64, category: PoiCategory) -> bool {
        self.category().contains(&category)
            && self.latitude.contains(&latitude)
            && self.longitude.contains(&longitude)
    }
}

fn bounded_interval(
    field: &'static str,
    low: f64,
    high: f64,
) -> Result<ClosedInterval<f64>, SearchValidationError> {
    for value in [low, high] {
        if !value.is_finite() {
            return Err(SearchValidationError::NonFiniteBound { field, value });
        }
    }
    ClosedInterval::new(low, high).ok_or(SearchValidationError::InvertedInterval {
        field,
        low,
        high,
    })
}

/// Wire shape of a search request body: an area plus a category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaAndCategoryPayload {
    pub latitude_min: f64,
    pub latitude_max: f64,
    pub longitude_min: f64,
    pub longitude_max: f64,
    pub category: PoiCategory,
}

impl TryFrom<AreaAndCategoryPayload> for AreaAndCategory {
    type Error = SearchValidationError;

    fn try_from(value: AreaAndCategoryPayload) -> Result<Self, Self::Error> {
        Self::new(
            value.latitude_min,
            value.latitude_max,
            value.longitude_min,
            value.longitude_max,
            value.category,
        )
    }
}
