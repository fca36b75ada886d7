//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn serialises_camel_case_and_skips_missing_details() {
    let value = serde_json::to_value(Error::not_found("poi missing")).expect("serialise");
    assert_eq!(value, json!({ "code": "not_found", "message": "poi missing" }));
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "internal_error", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn details_survive_round_trip() {
    let error = Error::invalid_request("Position is missing.")
        .with_details(json!({ "code": "position_missing" }));
    let encoded = serde_json::to_string(&error).expect("serialise");
    let decoded: Error = serde_json::from_str(&encoded).expect("deserialise");

    assert_eq!(decoded, error);
    assert_eq!(
        decoded.details().and_then(|d| d.get("code")),
        Some(&json!("position_missing"))
    );
}
