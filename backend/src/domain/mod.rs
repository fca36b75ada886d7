//! Domain primitives, services, and the in-memory search index.
//!
//! Purpose: define the POI catalogue model and the services behind the
//! create, delete, and search operations. Inbound adapters depend on the
//! driving ports; outbound adapters implement [`ports::PoiStore`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Poi, PoiCategory, Position: catalogue records and value objects.
//! - AreaAndCategory: search query over the index.
//! - PoiIndex: snapshot-swapped spatial-categorical index.
//! - PoiCommandService, PoiQueryService: driving port implementations.

pub mod error;
pub mod poi;
pub mod poi_index;
mod poi_service;
pub mod ports;
pub mod search;
pub mod unit_of_work;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::poi::{
    POI_NAME_MAX, Poi, PoiCategory, PoiDraft, PoiId, PoiName, PoiValidationError, Position,
};
pub use self::poi_index::{
    PoiIndex, PoiIndexConfig, PoiIndexError, PoiIndexRefresher, PoiIndexStatus,
};
pub use self::poi_service::{PoiCommandService, PoiQueryService};
pub use self::search::{
    AreaAndCategory, AreaAndCategoryPayload, ClosedInterval, SEARCH_LIMIT, SEARCH_RESULT_LIMIT,
    SearchValidationError,
};
pub use self::unit_of_work::within_unit_of_work;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use poi_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such poi"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
