//! HTTP-level tests for AI copy generation.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, post_empty, post_json, section_id};
use serde_json::json;

async fn seed_example(test: &common::TestApp, section_type: &str) {
    let response = post_json(
        test.app(),
        "/api/v1/ai-examples",
        json!({
            "section_type": section_type,
            "project_type": "reklamefilm",
            "text": "Vi vil at seerne skal kjenne på lysten til å reise.",
            "quality_score": 9
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_missing_parameter_is_rejected() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/ai/generate",
        json!({"projectType": "reklamefilm", "medium": "film", "sectionType": "goal"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("targetAudience"));
}

#[tokio::test]
async fn test_no_examples_is_unprocessable() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/api/v1/ai/generate",
        json!({
            "projectType": "reklamefilm",
            "medium": "film",
            "targetAudience": "unge voksne",
            "sectionType": "goal"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "NO_EXAMPLES");
}

#[tokio::test]
async fn test_generate_strips_wrapping_quotes() {
    let test = common::build_test_app();
    seed_example(&test, "goal").await;

    let response = post_json(
        test.app(),
        "/api/v1/ai/generate",
        json!({
            "projectType": "reklamefilm",
            "medium": "film",
            "targetAudience": "unge voksne",
            "sectionType": "goal"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], "Vi lager film som flytter folk.");
    assert_eq!(json["data"]["example_count"], 1);
}

#[tokio::test]
async fn test_generate_into_open_section() {
    let test = common::build_test_app();
    seed_example(&test, "concept").await;
    let (id, sections) = create_project(&test, "Konsept").await;
    let concept = section_id(&sections, "concept");
    post_empty(test.app(), &format!("/api/v1/projects/{id}/composer")).await;

    let response = post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/composer/sections/{concept}/generate"),
        json!({"projectType": "reklamefilm", "medium": "film", "targetAudience": "familier"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["section"]["content"]["text"], "Vi lager film som flytter folk.");
}
