//! HTTP-level tests for publishing, the public share page, viewer analytics
//! and quote acceptance.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, post_empty, post_json, put_json, section_id};
use serde_json::json;

/// Create and publish a project; returns `(project_id, token, sections)`.
async fn published(test: &common::TestApp) -> (i64, String, Vec<serde_json::Value>) {
    let (id, sections) = create_project(test, "Vinterkampanje").await;
    let response = post_empty(test.app(), &format!("/api/v1/projects/{id}/publish")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();
    (id, token, sections)
}

// ---------------------------------------------------------------------------
// Publish / unpublish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_publish_returns_share_url() {
    let test = common::build_test_app();
    let (id, _) = create_project(&test, "Lansering").await;

    let response = post_empty(test.app(), &format!("/api/v1/projects/{id}/publish")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap();
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["reused_token"], false);
    assert_eq!(
        json["data"]["share_url"],
        format!("https://pitch.test/p/{token}")
    );

    let response = get(test.app(), &format!("/api/v1/projects/{id}/share")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["share_url"], format!("https://pitch.test/p/{token}"));
}

#[tokio::test]
async fn test_republish_reuses_the_token() {
    let test = common::build_test_app();
    let (id, token, _) = published(&test).await;

    let response = post_empty(test.app(), &format!("/api/v1/projects/{id}/publish")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["token"], token.as_str());
    assert_eq!(json["data"]["reused_token"], true);
}

#[tokio::test]
async fn test_unpublish_needs_confirmation_and_revokes_the_link() {
    let test = common::build_test_app();
    let (id, token, _) = published(&test).await;

    let response = delete(test.app(), &format!("/api/v1/projects/{id}/publish")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CONFIRMATION_REQUIRED");
    assert_eq!(get(test.app(), &format!("/p/{token}")).await.status(), StatusCode::OK);

    let response = delete(test.app(), &format!("/api/v1/projects/{id}/publish?confirm=true")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "draft");
    assert!(json["data"]["share_url"].is_null());

    assert_eq!(get(test.app(), &format!("/p/{token}")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpublish_draft_conflicts() {
    let test = common::build_test_app();
    let (id, _) = create_project(&test, "Utkast").await;
    let response = delete(test.app(), &format!("/api/v1/projects/{id}/publish?confirm=true")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Public page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_public_page_hides_invisible_sections_after_publish_flush() {
    let test = common::build_test_app();
    let (id, sections) = create_project(&test, "Synlighet").await;
    let contact = section_id(&sections, "contact");
    let hero = section_id(&sections, "hero");

    post_empty(test.app(), &format!("/api/v1/projects/{id}/composer")).await;
    let response = put_json(
        test.app(),
        &format!("/api/v1/projects/{id}/composer/sections/{contact}/visibility"),
        json!({"visible": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The hidden flag is still only an autosave waiting to fire.
    let response = post_empty(test.app(), &format!("/api/v1/projects/{id}/publish")).await;
    let token = body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(test.app(), &format!("/p/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Synlighet");
    assert_eq!(json["data"]["client_name"], "Fjordkraft");
    let ids: Vec<i64> = json["data"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&hero));
    assert!(!ids.contains(&contact));
    assert!(json["data"]["sections"][0]["edit"].is_null());
}

#[tokio::test]
async fn test_unknown_token_returns_404() {
    let test = common::build_test_app();
    let response = get(test.app(), "/p/doesnotexist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archived_project_is_not_served() {
    let test = common::build_test_app();
    let (id, token, _) = published(&test).await;
    post_empty(test.app(), &format!("/api/v1/projects/{id}/archive")).await;

    let response = get(test.app(), &format!("/p/{token}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_viewer_events_are_summarized() {
    let test = common::build_test_app();
    let (id, token, _) = published(&test).await;
    let uri = format!("/p/{token}/analytics");

    for event in [
        json!({"type": "start"}),
        json!({"type": "section", "sectionId": "goal", "dwellMs": 4000, "visibilityChanges": 1}),
        json!({"type": "section", "sectionId": "goal", "dwellMs": 1000}),
        json!({"type": "end", "durationMs": 9000}),
    ] {
        let response = post_json(test.app(), &uri, json!({"sessionId": "visit-1", "event": event})).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let response = get(test.app(), &format!("/api/v1/projects/{id}/analytics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["session_count"], 1);
    assert_eq!(json["data"]["finalized_count"], 1);
    assert_eq!(json["data"]["average_duration_ms"], 9000);
    assert_eq!(json["data"]["sections"][0]["section_id"], "goal");
    assert_eq!(json["data"]["sections"][0]["total_dwell_ms"], 5000);
}

#[tokio::test]
async fn test_analytics_for_unknown_token_returns_404() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/p/missing/analytics",
        json!({"sessionId": "visit-1", "event": {"type": "start"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analytics_for_archived_project_returns_404() {
    let test = common::build_test_app();
    let (id, token, _) = published(&test).await;
    post_empty(test.app(), &format!("/api/v1/projects/{id}/archive")).await;

    let response = post_json(
        test.app(),
        &format!("/p/{token}/analytics"),
        json!({"sessionId": "visit-3", "event": {"type": "start"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(test.app(), &format!("/api/v1/projects/{id}/analytics")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["session_count"], 0);
}

#[tokio::test]
async fn test_analytics_storage_failure_is_still_accepted() {
    let test = common::build_test_app();
    let (_, token, _) = published(&test).await;

    test.store.set_fail_writes(true);
    let response = post_json(
        test.app(),
        &format!("/p/{token}/analytics"),
        json!({"sessionId": "visit-2", "event": {"type": "start"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_quote_is_accepted_once() {
    let test = common::build_test_app();
    let (_, token, _) = published(&test).await;
    let uri = format!("/p/{token}/quote/accept");
    let body = json!({
        "pricing": {"total": 185000, "currency": "NOK"},
        "acceptedByName": "Kari Nordmann",
        "acceptedByEmail": "kari@example.no"
    });

    let response = post_json(test.app(), &uri, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["quote"]["accepted_by_name"], "Kari Nordmann");
    let quote_id = json["data"]["quote"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["contract"]["quote_id"], quote_id);

    let response = post_json(test.app(), &uri, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        test.app(),
        &format!("/quotes/{quote_id}/analytics"),
        json!({"sessionId": "quote-visit", "event": {"type": "start"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_quote_requires_a_name() {
    let test = common::build_test_app();
    let (_, token, _) = published(&test).await;
    let response = post_json(
        test.app(),
        &format!("/p/{token}/quote/accept"),
        json!({"pricing": {}, "acceptedByName": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_analytics_for_unknown_quote_returns_404() {
    let test = common::build_test_app();
    let response = post_json(
        test.app(),
        "/quotes/777/analytics",
        json!({"sessionId": "x", "event": {"type": "start"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
