//! Tests for POI command and query services.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    CursorFilter, MockPoiCursor, MockPoiStore, MockPoiUnitOfWork, PoiCreatePayload, PoiDocument,
};
use crate::domain::{
    AreaAndCategory, ErrorCode, PoiCategory, PoiIndexConfig, Position, SEARCH_RESULT_LIMIT,
};

#[fixture]
fn create_request() -> CreatePoiRequest {
    CreatePoiRequest {
        poi: PoiCreatePayload {
            name: "British Museum".to_owned(),
            position: Some(Position::new(51.5194, -0.127).expect("valid position")),
            category: PoiCategory::Museum,
        },
    }
}

fn store_with(uow: MockPoiUnitOfWork) -> MockPoiStore {
    let mut store = MockPoiStore::new();
    store
        .expect_begin_unit_of_work()
        .times(1)
        .return_once(move || Ok(Box::new(uow)));
    store
}

fn live_document(id: PoiId) -> PoiDocument {
    PoiDocument {
        id,
        name: "Old Bailey".to_owned(),
        latitude: 51.5155,
        longitude: -0.1019,
        category_code: PoiCategory::Landmark.code(),
        last_saved_at: Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp"),
        removed: false,
    }
}

#[rstest]
#[tokio::test]
async fn create_commits_and_returns_store_identifier(create_request: CreatePoiRequest) {
    let assigned = PoiId::random();
    let mut uow = MockPoiUnitOfWork::new();
    uow.expect_create()
        .withf(|draft| draft.name.as_str() == "British Museum")
        .times(1)
        .return_once(move |_| Ok(assigned));
    uow.expect_commit().times(1).return_once(|| Ok(()));
    let service = PoiCommandService::new(Arc::new(store_with(uow)));

    let response = service.create_poi(create_request).await.expect("created");

    assert_eq!(response.id, assigned);
}

#[rstest]
#[tokio::test]
async fn create_without_position_never_touches_store(mut create_request: CreatePoiRequest) {
    create_request.poi.position = None;
    let mut store = MockPoiStore::new();
    store.expect_begin_unit_of_work().never();
    let service = PoiCommandService::new(Arc::new(store));

    let error = service
        .create_poi(create_request)
        .await
        .expect_err("position required");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("code")),
        Some(&json!("position_missing"))
    );
}

#[rstest]
#[tokio::test]
async fn create_rolls_back_when_store_rejects(create_request: CreatePoiRequest) {
    let mut uow = MockPoiUnitOfWork::new();
    uow.expect_create()
        .times(1)
        .return_once(|_| Err(PoiStoreError::query("duplicate key")));
    uow.expect_commit().never();
    uow.expect_rollback().times(1).return_once(|| Ok(()));
    let service = PoiCommandService::new(Arc::new(store_with(uow)));

    let error = service
        .create_poi(create_request)
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn delete_marks_existing_poi_and_commits() {
    let id = PoiId::random();
    let mut uow = MockPoiUnitOfWork::new();
    uow.expect_get()
        .with(eq(id))
        .times(1)
        .return_once(move |_| Ok(Some(live_document(id))));
    uow.expect_mark_removed()
        .with(eq(id))
        .times(1)
        .return_once(|_| Ok(()));
    uow.expect_commit().times(1).return_once(|| Ok(()));
    let service = PoiCommandService::new(Arc::new(store_with(uow)));

    service
        .delete_poi(DeletePoiRequest { id })
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn delete_of_unknown_poi_is_not_found_and_rolls_back() {
    let id = PoiId::random();
    let mut uow = MockPoiUnitOfWork::new();
    uow.expect_get().times(1).return_once(|_| Ok(None));
    uow.expect_mark_removed().never();
    uow.expect_commit().never();
    uow.expect_rollback().times(1).return_once(|| Ok(()));
    let service = PoiCommandService::new(Arc::new(store_with(uow)));

    let error = service
        .delete_poi(DeletePoiRequest { id })
        .await
        .expect_err("unknown id");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.details().and_then(|details| details.get("code")),
        Some(&json!("poi_not_found"))
    );
}

#[rstest]
#[case(PoiStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PoiStoreError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn delete_maps_store_errors(#[case] failure: PoiStoreError, #[case] expected: ErrorCode) {
    let mut store = MockPoiStore::new();
    store
        .expect_begin_unit_of_work()
        .times(1)
        .return_once(move || Err(failure));
    let service = PoiCommandService::new(Arc::new(store));

    let error = service
        .delete_poi(DeletePoiRequest { id: PoiId::random() })
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), expected);
}

fn documents_in_band(count: usize) -> Vec<PoiDocument> {
    (0..count)
        .map(|offset| {
            let mut document = live_document(PoiId::random());
            document.latitude = 10.0 + offset as f64 * 0.001;
            document.longitude = 20.0;
            document
        })
        .collect()
}

fn query_service_over(documents: Vec<PoiDocument>) -> PoiQueryService {
    let mut store = MockPoiStore::new();
    store
        .expect_open_cursor()
        .with(eq(CursorFilter::All))
        .times(1)
        .return_once(move |_| {
            let mut batches: VecDeque<Vec<PoiDocument>> =
                documents.chunks(64).map(<[PoiDocument]>::to_vec).collect();
            let mut cursor = MockPoiCursor::new();
            cursor
                .expect_next_batch()
                .returning(move |_| Ok(batches.pop_front().unwrap_or_default()));
            Ok(Box::new(cursor))
        });
    store.expect_begin_unit_of_work().never();
    let index = PoiIndex::new(
        Arc::new(store),
        Arc::new(DefaultClock),
        PoiIndexConfig::default(),
    );
    PoiQueryService::new(Arc::new(index))
}

fn band_query() -> SearchPoisRequest {
    SearchPoisRequest {
        query: AreaAndCategory::new(9.0, 11.0, 19.0, 21.0, PoiCategory::Landmark)
            .expect("valid query"),
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(SEARCH_RESULT_LIMIT)]
#[tokio::test]
async fn search_returns_every_match_up_to_the_limit(#[case] count: usize) {
    let service = query_service_over(documents_in_band(count));

    let response = service.search_pois(band_query()).await.expect("search");

    match response {
        SearchPoisResponse::Found(payload) => assert_eq!(payload.len(), count),
        SearchPoisResponse::RefineQuery => panic!("expected matches for {count} entries"),
    }
}

#[rstest]
#[case(SEARCH_RESULT_LIMIT + 1)]
#[case(SEARCH_RESULT_LIMIT * 3)]
#[tokio::test]
async fn search_asks_to_refine_beyond_the_limit(#[case] count: usize) {
    let service = query_service_over(documents_in_band(count));

    let response = service.search_pois(band_query()).await.expect("search");

    assert_eq!(response, SearchPoisResponse::RefineQuery);
}

#[rstest]
#[tokio::test]
async fn search_maps_build_failure_to_service_unavailable() {
    let mut store = MockPoiStore::new();
    store
        .expect_open_cursor()
        .times(1)
        .return_once(|_| Err(PoiStoreError::connection("down")));
    let index = PoiIndex::new(
        Arc::new(store),
        Arc::new(DefaultClock),
        PoiIndexConfig::default(),
    );
    let service = PoiQueryService::new(Arc::new(index));

    let error = service
        .search_pois(band_query())
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
