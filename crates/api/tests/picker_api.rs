//! HTTP-level tests for picker selection rules.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;

#[tokio::test]
async fn test_toggle_adds_and_reports_fullness() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/pickers/case_study/toggle",
        json!({"selected": [1, 2, 3], "id": 4}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "case_study");
    assert_eq!(json["data"]["max"], 4);
    assert_eq!(json["data"]["selected"], json!([1, 2, 3, 4]));
    assert_eq!(json["data"]["full"], true);
}

#[tokio::test]
async fn test_toggle_removes_selected_id() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/pickers/team_member/toggle",
        json!({"selected": [5, 6], "id": 5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["selected"], json!([6]));
    assert!(json["data"]["max"].is_null());
    assert_eq!(json["data"]["full"], false);
}

#[tokio::test]
async fn test_toggle_on_full_case_selection_is_rejected() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/pickers/case_study/toggle",
        json!({"selected": [1, 2, 3, 4], "id": 5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_image_picker_uses_caller_cap() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/pickers/image/toggle",
        json!({"selected": [10, 11], "id": 12, "max": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        test.app(),
        "/api/v1/pickers/image/toggle",
        json!({"selected": [10, 11], "id": 12}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["selected"], json!([10, 11, 12]));
}
