//! HTTP-level tests for section background images and their positions.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, create_project, get, post_json, put_json, section_id};
use pitch_db::MemoryStore;
use serde_json::json;

async fn image(test: &common::TestApp, path: &str) -> i64 {
    let response = post_json(test.app(), "/api/v1/images", json!({"file_path": path})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// A hero section with one attached image; returns `(section_id, image_id)`.
async fn hero_with_image(test: &common::TestApp) -> (i64, i64) {
    let (_, sections) = create_project(test, "Bakgrunn").await;
    let hero = section_id(&sections, "hero");
    let image_id = image(test, "hero/fjell.jpg").await;

    let response = put_json(
        test.app(),
        &format!("/api/v1/sections/{hero}/images"),
        json!({"imageIds": [image_id]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    (hero, image_id)
}

#[tokio::test]
async fn test_attached_image_has_default_cover_style() {
    let test = common::build_test_app();
    let (hero, image_id) = hero_with_image(&test).await;

    let response = get(test.app(), &format!("/api/v1/sections/{hero}/images")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let first = &json["data"][0];
    assert_eq!(first["image_id"], image_id);
    assert_eq!(
        first["style"]["backgroundImage"],
        "url(https://cdn.test/storage/images/hero/fjell.jpg)"
    );
    assert_eq!(first["style"]["backgroundPosition"], "50% 50%");
    assert_eq!(first["style"]["backgroundSize"], "cover");
}

#[tokio::test]
async fn test_position_is_clamped_and_styled() {
    let test = common::build_test_app();
    let (hero, image_id) = hero_with_image(&test).await;

    let response = put_json(
        test.app(),
        &format!("/api/v1/sections/{hero}/images/{image_id}/position"),
        json!({"x": 150.0, "y": 20.0, "zoom": 2.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["saved"], true);
    assert_eq!(json["data"]["x"], 100.0);
    assert_eq!(json["data"]["style"]["backgroundPosition"], "100% 20%");
    assert_eq!(json["data"]["style"]["backgroundSize"], "200%");
}

#[tokio::test]
async fn test_zoom_out_of_range_is_rejected() {
    let test = common::build_test_app();
    let (hero, image_id) = hero_with_image(&test).await;

    let response = put_json(
        test.app(),
        &format!("/api/v1/sections/{hero}/images/{image_id}/position"),
        json!({"x": 10.0, "y": 10.0, "zoom": 9.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_position_for_unattached_image_returns_404() {
    let test = common::build_test_app();
    let (hero, _) = hero_with_image(&test).await;
    let other = image(&test, "annet.jpg").await;

    let response = put_json(
        test.app(),
        &format!("/api/v1/sections/{hero}/images/{other}/position"),
        json!({"x": 10.0, "y": 10.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_position_without_schema_support_is_acknowledged() {
    let test = common::build_test_app_with(Arc::new(MemoryStore::with_image_positions(false)));
    let (hero, image_id) = hero_with_image(&test).await;

    let response = put_json(
        test.app(),
        &format!("/api/v1/sections/{hero}/images/{image_id}/position"),
        json!({"x": 30.0, "y": 70.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["saved"], false);
    assert_eq!(json["data"]["style"]["backgroundPosition"], "50% 50%");
}

#[tokio::test]
async fn test_replace_rejects_unknown_images_and_overflow() {
    let test = common::build_test_app();
    let (hero, image_id) = hero_with_image(&test).await;
    let second = image(&test, "to.jpg").await;
    let uri = format!("/api/v1/sections/{hero}/images");

    let response = put_json(test.app(), &uri, json!({"imageIds": [image_id, 9999]})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        test.app(),
        &uri,
        json!({"imageIds": [image_id, second], "max": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(test.app(), &uri, json!({"imageIds": [second, image_id]})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["image_id"], second);
    assert_eq!(json["data"][1]["order_index"], 1);
}
