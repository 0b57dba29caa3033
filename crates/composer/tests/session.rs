mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use pitch_composer::session::ComposerSession;
use pitch_composer::{ComposerError, ComposerRegistry, SaveError};
use pitch_core::error::CoreError;
use pitch_db::models::collage_preset::CreateCollagePreset;
use pitch_db::models::image::CreateImage;
use pitch_db::{LibraryStore, SectionStore, StoreError};
use serde_json::json;

use common::{case_study, dyn_store, section_of, seeded, team_member, QUIET};

#[tokio::test(start_paused = true)]
async fn burst_of_edits_is_persisted_once() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    for i in 0..5 {
        session.update_content(goal, "text", json!(format!("utkast {i}"))).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(store.project_touches(), 0);
    assert!(session.has_pending_save());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(store.project_touches(), 1);
    assert_eq!(store.section_saves(), sections.len());
    let saved = store.get_section(goal).await.unwrap().unwrap();
    assert_eq!(saved.content, json!({ "text": "utkast 4" }));
}

#[tokio::test(start_paused = true)]
async fn save_persists_state_at_fire_time() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let concept = section_of(&sections, "concept");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    session.update_content(goal, "text", json!("først")).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    session.update_content(concept, "text", json!("senere")).unwrap();
    session.set_visibility(goal, false).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let goal_row = store.get_section(goal).await.unwrap().unwrap();
    let concept_row = store.get_section(concept).await.unwrap().unwrap();
    assert_eq!(goal_row.content, json!({ "text": "først" }));
    assert!(!goal_row.visible);
    assert_eq!(concept_row.content, json!({ "text": "senere" }));
    assert_eq!(store.project_touches(), 1);
}

#[tokio::test]
async fn partial_update_keeps_other_keys() {
    let (store, project, sections) = seeded().await;
    let deliverables = section_of(&sections, "deliverables");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    session.update_content(deliverables, "text", json!("gammel")).unwrap();
    session.add_deliverable(deliverables).unwrap();
    let before = session.section(deliverables).unwrap().content["deliverableItems"].clone();

    let updated = session.update_content(deliverables, "text", json!("ny")).unwrap();
    assert_eq!(updated.content["text"], json!("ny"));
    assert_eq!(updated.content["deliverableItems"], before);
}

#[tokio::test]
async fn explicit_save_surfaces_failures() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();
    session.update_content(goal, "text", json!("tekst")).unwrap();

    store.set_fail_writes(true);
    let err = session.handle_save(true).await.unwrap_err();
    assert_matches!(err, SaveError::Section { source: StoreError::Unavailable(_), .. });

    let report = session.handle_save(false).await.unwrap();
    assert!(!report.persisted);
    assert_eq!(store.project_touches(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_autosave_is_silent_and_next_edit_retries() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    store.set_fail_writes(true);
    session.update_content(goal, "text", json!("første")).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.project_touches(), 0);
    assert!(!session.has_pending_save());

    store.set_fail_writes(false);
    session.update_content(goal, "text", json!("andre")).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.project_touches(), 1);
}

#[tokio::test]
async fn failing_section_aborts_remaining_writes() {
    let (store, project, sections) = seeded().await;
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();
    let second = sections[1].id;
    store.fail_section_writes(second);

    let err = session.handle_save(true).await.unwrap_err();
    assert_matches!(err, SaveError::Section { section_id, .. } if section_id == second);
    assert_eq!(store.section_saves(), 1);
    assert_eq!(store.project_touches(), 0);
}

#[tokio::test]
async fn case_study_selection_is_fully_replaced() {
    let (store, project, sections) = seeded().await;
    let cases = section_of(&sections, "cases");
    let a = case_study(store.as_ref(), "Fjellfilm").await;
    let b = case_study(store.as_ref(), "Kystfoto").await;
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    session.set_case_studies(&[a, b]).await.unwrap();
    session.handle_save(true).await.unwrap();
    assert_eq!(store.list_section_case_studies(cases).await.unwrap().len(), 2);

    session.set_case_studies(&[b]).await.unwrap();
    let report = session.handle_save(true).await.unwrap();
    assert_eq!(report.case_studies, Some(1));
    let remaining: Vec<_> = store
        .list_section_case_studies(cases)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(remaining, vec![b]);

    session.set_case_studies(&[]).await.unwrap();
    session.handle_save(true).await.unwrap();
    assert!(store.list_section_case_studies(cases).await.unwrap().is_empty());
}

#[tokio::test]
async fn case_study_selection_is_capped_at_four() {
    let (store, project, _) = seeded().await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d", "e"] {
        ids.push(case_study(store.as_ref(), title).await);
    }
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let err = session.set_case_studies(&ids).await.unwrap_err();
    assert_matches!(err, ComposerError::Core(CoreError::Validation(_)));
    assert!(session.set_case_studies(&ids[..4]).await.is_ok());
}

#[tokio::test]
async fn unknown_library_ids_are_rejected() {
    let (store, project, _) = seeded().await;
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let err = session.set_team_members(&[9999]).await.unwrap_err();
    assert_matches!(err, ComposerError::Core(CoreError::NotFound { entity: "TeamMember", .. }));
}

#[tokio::test]
async fn reopening_loads_saved_team_selection() {
    let (store, project, sections) = seeded().await;
    let team = section_of(&sections, "team");
    let kari = team_member(store.as_ref(), "Kari").await;
    let ola = team_member(store.as_ref(), "Ola").await;

    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();
    session.set_team_members(&[ola, kari]).await.unwrap();
    session.handle_save(true).await.unwrap();

    let reopened = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();
    let selection = reopened.team_selection().unwrap();
    assert_eq!(selection.section_id, team);
    assert_eq!(selection.ids, vec![ola, kari]);
}

#[tokio::test]
async fn quote_section_can_only_be_added_once() {
    let (store, project, _) = seeded().await;
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let quote = session.add_section("quote").await.unwrap();
    assert_eq!(quote.section_type, "quote");
    assert_eq!(quote.order_index, 9);

    let err = session.add_section("quote").await.unwrap_err();
    assert_matches!(err, ComposerError::Core(CoreError::Conflict(_)));

    let err = session.add_section("carousel").await.unwrap_err();
    assert_matches!(err, ComposerError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn removed_section_is_deleted_and_dropped_from_state() {
    let (store, project, sections) = seeded().await;
    let contact = section_of(&sections, "contact");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    session.remove_section(contact).await.unwrap();
    assert!(session.section(contact).is_none());
    assert!(store.get_section(contact).await.unwrap().is_none());
    assert_eq!(session.sections().len(), sections.len() - 1);
}

#[tokio::test]
async fn reorder_requires_every_section_once() {
    let (store, project, sections) = seeded().await;
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let mut order: Vec<i64> = sections.iter().map(|s| s.id).collect();
    order.reverse();
    let reordered = session.reorder(&order).unwrap();
    assert_eq!(reordered[0].id, order[0]);
    assert_eq!(reordered[0].order_index, 0);

    let err = session.reorder(&order[1..]).unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}

#[tokio::test]
async fn timeline_phase_index_is_bounded() {
    let (store, project, sections) = seeded().await;
    let timeline = section_of(&sections, "timeline");
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let updated = session
        .edit_timeline_phase(timeline, 0, "Oppstart", "Vi møtes.")
        .unwrap();
    assert_eq!(updated.content["timelineItems"][0]["title"], json!("Oppstart"));
    assert!(session.edit_timeline_phase(timeline, 4, "x", "y").is_err());
}

#[tokio::test]
async fn collage_preset_fills_all_five_slots() {
    let (store, project, sections) = seeded().await;
    let example_work = section_of(&sections, "example_work");
    let mut images = Vec::new();
    for i in 0..5 {
        let image = store
            .create_image(&CreateImage {
                file_path: format!("collage/{i}.jpg"),
                title: None,
                category: None,
                tags: vec![],
                width: None,
                height: None,
            })
            .await
            .unwrap();
        images.push(image.id);
    }
    let preset = store
        .create_collage_preset(&CreateCollagePreset {
            name: "Sommer".to_string(),
            keywords: vec![],
            pos1: images[0],
            pos2: images[1],
            pos3: images[2],
            pos4: images[3],
            pos5: images[4],
        })
        .await
        .unwrap();
    let session = ComposerSession::open(dyn_store(&store), project.id, QUIET).await.unwrap();

    let updated = session.apply_collage_preset(example_work, preset.id).await.unwrap();
    assert_eq!(updated.content["presetId"], json!(preset.id));
    assert_eq!(updated.content["pos5"], json!(images[4]));

    let goal = section_of(&sections, "goal");
    assert!(session.apply_collage_preset(goal, preset.id).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn closing_flushes_pending_save_and_leaves_edit_mode() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let registry = ComposerRegistry::new(dyn_store(&store), QUIET);

    let session = registry.open(project.id).await.unwrap();
    session.update_content(goal, "text", json!("lagres ved lukking")).unwrap();
    assert!(registry.close(project.id).await);

    assert_eq!(store.project_touches(), 1);
    assert!(!session.is_edit_mode());
    assert_matches!(
        session.update_content(goal, "text", json!("for sent")),
        Err(CoreError::Conflict(_))
    );
    assert!(registry.require(project.id).is_err());
}

#[tokio::test]
async fn opening_unknown_project_fails() {
    let (store, _, _) = seeded().await;
    let err = ComposerSession::open(dyn_store(&store), 4242, QUIET).await.err().unwrap();
    assert_matches!(err, ComposerError::Core(CoreError::NotFound { entity: "Project", .. }));
}

#[tokio::test]
async fn registry_returns_the_same_session() {
    let (store, project, sections) = seeded().await;
    let goal = section_of(&sections, "goal");
    let registry = ComposerRegistry::new(dyn_store(&store), QUIET);

    let first = registry.open(project.id).await.unwrap();
    first.update_content(goal, "text", json!("delt")).unwrap();
    let second = registry.open(project.id).await.unwrap();
    assert_eq!(second.section(goal).unwrap().content["text"], json!("delt"));
    assert_eq!(registry.open_count(), 1);
    registry.close_all().await;
    assert_eq!(registry.open_count(), 0);
}
