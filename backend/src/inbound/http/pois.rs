//! POI catalogue HTTP handlers.
//!
//! ```text
//! POST /api/v1/poi_create
//! POST /api/v1/poi_delete
//! POST /api/v1/poi_search
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    CreatePoiRequest, CreatePoiResponse, DeletePoiRequest, PoiCreatePayload,
    PoiSearchDataPayload, SearchPoisRequest, SearchPoisResponse,
};
use crate::domain::{AreaAndCategory, AreaAndCategoryPayload, Error, SearchValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Search reply: either the matches or a request to narrow the area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SearchPoisResponseBody {
    /// Every POI matching the query.
    Found { pois: Vec<PoiSearchDataPayload> },
    /// Too many matches; always `{"refine": true}`.
    Refine { refine: bool },
}

impl From<SearchPoisResponse> for SearchPoisResponseBody {
    fn from(value: SearchPoisResponse) -> Self {
        match value {
            SearchPoisResponse::Found(payload) => Self::Found { pois: payload.pois },
            SearchPoisResponse::RefineQuery => Self::Refine { refine: true },
        }
    }
}

fn invalid_search_area(err: SearchValidationError) -> Error {
    let field = match &err {
        SearchValidationError::InvertedInterval { field, .. }
        | SearchValidationError::NonFiniteBound { field, .. } => *field,
    };
    Error::invalid_request(format!("invalid search area: {err}"))
        .with_details(json!({ "field": field, "code": "invalid_search_area" }))
}

/// Create a POI and return its identifier.
///
/// The new POI becomes searchable after the next index refresh.
#[utoipa::path(
    post,
    path = "/api/v1/poi_create",
    request_body = PoiCreatePayload,
    responses(
        (status = 200, description = "POI created", body = CreatePoiResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pois"],
    operation_id = "createPoi"
)]
#[post("/poi_create")]
pub async fn create_poi(
    state: web::Data<HttpState>,
    payload: web::Json<PoiCreatePayload>,
) -> ApiResult<web::Json<CreatePoiResponse>> {
    let response = state
        .pois
        .create_poi(CreatePoiRequest {
            poi: payload.into_inner(),
        })
        .await?;
    Ok(web::Json(response))
}

/// Mark a POI for removal.
///
/// The POI keeps appearing in searches until the next index refresh.
#[utoipa::path(
    post,
    path = "/api/v1/poi_delete",
    request_body = DeletePoiRequest,
    responses(
        (status = 204, description = "POI marked for removal"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "POI does not exist", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pois"],
    operation_id = "deletePoi"
)]
#[post("/poi_delete")]
pub async fn delete_poi(
    state: web::Data<HttpState>,
    payload: web::Json<DeletePoiRequest>,
) -> ApiResult<HttpResponse> {
    state.pois.delete_poi(payload.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Search an area for POIs of one category.
#[utoipa::path(
    post,
    path = "/api/v1/poi_search",
    request_body = AreaAndCategoryPayload,
    responses(
        (status = 200, description = "Matches, or a request to refine the area", body = SearchPoisResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Index could not be built", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pois"],
    operation_id = "searchPois"
)]
#[post("/poi_search")]
pub async fn search_pois(
    state: web::Data<HttpState>,
    payload: web::Json<AreaAndCategoryPayload>,
) -> ApiResult<web::Json<SearchPoisResponseBody>> {
    let query = AreaAndCategory::try_from(payload.into_inner()).map_err(invalid_search_area)?;
    let response = state
        .pois_query
        .search_pois(SearchPoisRequest { query })
        .await?;
    Ok(web::Json(response.into()))
}

#[cfg(test)]
#[path = "pois_tests.rs"]
mod tests;
