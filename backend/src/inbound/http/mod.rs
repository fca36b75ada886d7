//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod error;
pub mod health;
pub mod pois;
pub mod state;

pub use error::ApiResult;

/// JSON extractor configuration reporting malformed bodies as domain
/// validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}")).into()
    })
}
