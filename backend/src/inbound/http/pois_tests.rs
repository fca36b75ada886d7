//! Tests for POI HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixturePoiCommand, FixturePoiQuery, MockPoiCommand, MockPoiQuery, PoiCommand, PoiQuery,
    PoisSearchDataPayload,
};
use crate::domain::{PoiCategory, PoiId, Position};
use crate::inbound::http::json_config;

fn test_app(
    command: Arc<dyn PoiCommand>,
    query: Arc<dyn PoiQuery>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(command, query)))
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(create_poi)
                .service(delete_poi)
                .service(search_pois),
        )
}

fn search_body() -> Value {
    json!({
        "latitudeMin": 51.0,
        "latitudeMax": 52.0,
        "longitudeMin": -1.0,
        "longitudeMax": 1.0,
        "category": "museum"
    })
}

#[rstest]
#[actix_rt::test]
async fn create_returns_identifier() {
    let app = actix_test::init_service(test_app(
        Arc::new(FixturePoiCommand),
        Arc::new(FixturePoiQuery),
    ))
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_create")
        .set_json(json!({
            "name": "Science Museum",
            "position": { "latitude": 51.4978, "longitude": -0.1745 },
            "category": "museum"
        }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body["id"].as_str().is_some_and(|id| id.parse::<PoiId>().is_ok()));
}

#[rstest]
#[actix_rt::test]
async fn create_without_position_is_bad_request() {
    let app = actix_test::init_service(test_app(
        Arc::new(FixturePoiCommand),
        Arc::new(FixturePoiQuery),
    ))
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_create")
        .set_json(json!({ "name": "Nowhere", "category": "landmark" }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "position_missing");
}

#[rstest]
#[actix_rt::test]
async fn create_with_unknown_category_is_bad_request() {
    let app = actix_test::init_service(test_app(
        Arc::new(FixturePoiCommand),
        Arc::new(FixturePoiQuery),
    ))
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_create")
        .set_json(json!({
            "name": "Mystery",
            "position": { "latitude": 0.0, "longitude": 0.0 },
            "category": "volcano"
        }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_rt::test]
async fn delete_of_unknown_poi_is_not_found() {
    let id = PoiId::random();
    let mut command = MockPoiCommand::new();
    command
        .expect_delete_poi()
        .times(1)
        .return_once(move |request| {
            assert_eq!(request.id, id);
            Err(Error::not_found("poi does not exist")
                .with_details(json!({ "code": "poi_not_found" })))
        });
    let app =
        actix_test::init_service(test_app(Arc::new(command), Arc::new(FixturePoiQuery))).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_delete")
        .set_json(json!({ "id": id.to_string() }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "poi_not_found");
}

#[rstest]
#[actix_rt::test]
async fn delete_returns_no_content() {
    let app = actix_test::init_service(test_app(
        Arc::new(FixturePoiCommand),
        Arc::new(FixturePoiQuery),
    ))
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_delete")
        .set_json(json!({ "id": PoiId::random().to_string() }))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_rt::test]
async fn search_returns_matches() {
    let hit = PoiSearchDataPayload {
        id: PoiId::random(),
        name: "Natural History Museum".to_owned(),
        position: Position::new(51.4967, -0.1764).expect("valid position"),
    };
    let expected = hit.clone();
    let mut query = MockPoiQuery::new();
    query.expect_search_pois().times(1).return_once(move |request| {
        assert_eq!(request.query.category().low(), PoiCategory::Museum);
        Ok(SearchPoisResponse::Found(PoisSearchDataPayload { pois: vec![hit] }))
    });
    let app =
        actix_test::init_service(test_app(Arc::new(FixturePoiCommand), Arc::new(query))).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_search")
        .set_json(search_body())
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: SearchPoisResponseBody = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        SearchPoisResponseBody::Found {
            pois: vec![expected]
        }
    );
}

#[rstest]
#[actix_rt::test]
async fn search_refine_reply_has_no_pois_member() {
    let mut query = MockPoiQuery::new();
    query
        .expect_search_pois()
        .times(1)
        .return_once(|_| Ok(SearchPoisResponse::RefineQuery));
    let app =
        actix_test::init_service(test_app(Arc::new(FixturePoiCommand), Arc::new(query))).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_search")
        .set_json(search_body())
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "refine": true }));
}

#[rstest]
#[actix_rt::test]
async fn search_with_inverted_area_is_rejected_before_querying() {
    let mut query = MockPoiQuery::new();
    query.expect_search_pois().never();
    let app =
        actix_test::init_service(test_app(Arc::new(FixturePoiCommand), Arc::new(query))).await;
    let mut body = search_body();
    body["latitudeMin"] = json!(53.0);
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_search")
        .set_json(body)
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "latitude");
}

#[rstest]
#[actix_rt::test]
async fn search_unavailable_store_maps_to_503() {
    let mut query = MockPoiQuery::new();
    query
        .expect_search_pois()
        .times(1)
        .return_once(|_| Err(Error::service_unavailable("poi store unavailable")));
    let app =
        actix_test::init_service(test_app(Arc::new(FixturePoiCommand), Arc::new(query))).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/poi_search")
        .set_json(search_body())
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
