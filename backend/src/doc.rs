//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the POI create, delete, and search endpoints plus the health
//!   probes
//! - **Schemas**: request and response payloads, the POI value objects they
//!   embed, and the error envelope
//!
//! The generated specification is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::ports::{
    CreatePoiResponse, DeletePoiRequest, PoiCreatePayload, PoiSearchDataPayload,
};
use crate::domain::{AreaAndCategoryPayload, Error, ErrorCode, PoiCategory, PoiId, Position};
use crate::inbound::http::pois::SearchPoisResponseBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "POI catalogue",
        description = "Create, delete, and search points of interest."
    ),
    paths(
        crate::inbound::http::pois::create_poi,
        crate::inbound::http::pois::delete_poi,
        crate::inbound::http::pois::search_pois,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AreaAndCategoryPayload,
        CreatePoiResponse,
        DeletePoiRequest,
        Error,
        ErrorCode,
        PoiCategory,
        PoiCreatePayload,
        PoiId,
        PoiSearchDataPayload,
        Position,
        SearchPoisResponseBody,
    )),
    tags(
        (name = "pois", description = "POI catalogue operations"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;
