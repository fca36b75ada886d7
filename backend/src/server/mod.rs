//! Server construction and route wiring.

mod config;

pub use config::ServerSettings;

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, get, web};
use utoipa::OpenApi;

use poi_backend::RequestLog;
use poi_backend::doc::ApiDoc;
use poi_backend::inbound::http::health::{HealthState, live, ready};
use poi_backend::inbound::http::json_config;
use poi_backend::inbound::http::pois::{create_poi, delete_poi, search_pois};
use poi_backend::inbound::http::state::HttpState;

/// Serve the generated OpenAPI document.
#[get("/api-docs/openapi.json")]
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(create_poi)
        .service(delete_poi)
        .service(search_pois);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(RequestLog)
        .service(api)
        .service(ready)
        .service(live)
        .service(openapi_json)
}

/// Construct an Actix HTTP server bound to `bind_addr`.
///
/// Marks the health state ready once the socket is bound; readiness still
/// waits for the index's first publish when the health state tracks one.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bind_addr: SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Route wiring coverage.

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use super::*;

    fn deps() -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::default()),
        }
    }

    #[actix_rt::test]
    async fn api_routes_are_mounted_under_v1() {
        let app = actix_test::init_service(build_app(deps())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/poi_search")
            .set_json(json!({
                "latitudeMin": 0.0,
                "latitudeMax": 1.0,
                "longitudeMin": 0.0,
                "longitudeMax": 1.0,
                "category": "landmark"
            }))
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("request-id"));
    }

    #[actix_rt::test]
    async fn malformed_json_is_a_domain_bad_request() {
        let app = actix_test::init_service(build_app(deps())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/poi_create")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_rt::test]
    async fn openapi_document_is_served() {
        let app = actix_test::init_service(build_app(deps())).await;
        let request = actix_test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request();

        let body: Value = actix_test::call_and_read_body_json(&app, request).await;

        assert!(body["paths"]["/api/v1/poi_search"].is_object());
    }
}
