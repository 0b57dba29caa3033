mod common;

use assert_matches::assert_matches;
use pitch_composer::{PublishController, PublishError};
use pitch_core::error::CoreError;
use pitch_core::publish::{STATUS_DRAFT, STATUS_PUBLISHED};
use pitch_db::{ProjectStore, ShareStore};

use common::{dyn_store, seeded};

const ORIGIN: &str = "https://pitch.example.no";

#[tokio::test]
async fn publishing_a_draft_creates_one_share() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);

    let outcome = controller.publish(project.id).await.unwrap();
    let share = store.find_share_by_project(project.id).await.unwrap().unwrap();

    assert_eq!(outcome.status, "published");
    assert!(!outcome.reused_token);
    assert_eq!(outcome.token.as_deref(), Some(share.token.as_str()));
    assert_eq!(outcome.share_url, Some(format!("{ORIGIN}/p/{}", share.token)));
    let project = store.get_project(project.id).await.unwrap().unwrap();
    assert_eq!(project.status_id, STATUS_PUBLISHED);
}

#[tokio::test]
async fn publishing_twice_reuses_the_token() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);

    let first = controller.publish(project.id).await.unwrap();
    let second = controller.publish(project.id).await.unwrap();

    assert!(second.reused_token);
    assert_eq!(first.token, second.token);
}

#[tokio::test]
async fn unpublish_requires_confirmation() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);
    controller.publish(project.id).await.unwrap();

    let err = controller.unpublish(project.id, false).await.unwrap_err();
    assert_matches!(err, PublishError::ConfirmationRequired);
    assert!(store.find_share_by_project(project.id).await.unwrap().is_some());
}

#[tokio::test]
async fn unpublish_revokes_link_and_republish_mints_new_token() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);

    let published = controller.publish(project.id).await.unwrap();
    let old_token = published.token.unwrap();

    let outcome = controller.unpublish(project.id, true).await.unwrap();
    assert_eq!(outcome.status, "draft");
    assert_eq!(outcome.share_url, None);
    assert!(store.find_share_by_token(&old_token).await.unwrap().is_none());
    let row = store.get_project(project.id).await.unwrap().unwrap();
    assert_eq!(row.status_id, STATUS_DRAFT);
    assert_eq!(controller.share_url(project.id).await.unwrap(), None);

    let republished = controller.publish(project.id).await.unwrap();
    assert!(!republished.reused_token);
    assert_ne!(republished.token.unwrap(), old_token);
}

#[tokio::test]
async fn unpublishing_a_draft_is_a_conflict() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);

    let err = controller.unpublish(project.id, true).await.unwrap_err();
    assert_matches!(err, PublishError::Core(CoreError::Conflict(_)));
}

#[tokio::test]
async fn failed_publish_leaves_status_unchanged_and_releases_flag() {
    let (store, project, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);

    store.set_fail_writes(true);
    assert_matches!(controller.publish(project.id).await, Err(PublishError::Store(_)));
    let row = store.get_project(project.id).await.unwrap().unwrap();
    assert_eq!(row.status_id, STATUS_DRAFT);
    assert!(!controller.is_in_flight(project.id));

    store.set_fail_writes(false);
    assert!(controller.publish(project.id).await.is_ok());
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let (store, _, _) = seeded().await;
    let controller = PublishController::new(dyn_store(&store), ORIGIN);
    assert_matches!(
        controller.publish(777).await,
        Err(PublishError::Core(CoreError::NotFound { entity: "Project", .. }))
    );
}
