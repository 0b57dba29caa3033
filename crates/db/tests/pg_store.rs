//! Postgres storage tests. Run with `DATABASE_URL` set and `--ignored`.

use pitch_db::models::case_study::CreateCaseStudy;
use pitch_db::models::project::NewProject;
use pitch_db::models::section::{CreateSection, SectionWrite};
use pitch_db::models::status::ProjectStatus;
use pitch_db::{PgStore, PitchStore};
use serde_json::json;
use sqlx::PgPool;

async fn store(pool: PgPool) -> PgStore {
    PgStore::connect(pool).await.unwrap()
}

fn new_project(title: &str) -> NewProject {
    NewProject {
        title: title.to_string(),
        slug: title.to_lowercase(),
        client_name: None,
        customer_id: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_bootstrap_detects_position_columns(pool: PgPool) {
    pitch_db::health_check(&pool).await.unwrap();
    let store = store(pool).await;
    assert!(store.capabilities().section_image_positions);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_project_starts_as_draft(pool: PgPool) {
    let store = store(pool).await;
    let project = store.create_project(&new_project("Demo")).await.unwrap();
    assert_eq!(project.status_id, ProjectStatus::Draft.id());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_section_save_and_case_study_replace(pool: PgPool) {
    let store = store(pool).await;
    let project = store.create_project(&new_project("Demo")).await.unwrap();
    let section = store
        .create_section(&CreateSection {
            project_id: project.id,
            section_type: "cases".to_string(),
            content: json!({}),
            visible: true,
            order_index: 0,
        })
        .await
        .unwrap();

    let write = SectionWrite {
        content: json!({"description": "Utvalgte prosjekter"}),
        visible: false,
        order_index: 3,
    };
    assert!(store.save_section(section.id, &write).await.unwrap());
    let saved = store.get_section(section.id).await.unwrap().unwrap();
    assert_eq!(saved.content, write.content);
    assert!(!saved.visible);

    let mut ids = Vec::new();
    for title in ["A", "B"] {
        let cs = store
            .create_case_study(&CreateCaseStudy {
                title: title.to_string(),
                description: None,
                thumbnail_path: None,
                tags: vec![],
                cta_label: None,
                cta_url: None,
            })
            .await
            .unwrap();
        ids.push(cs.id);
    }
    store.replace_section_case_studies(section.id, &ids).await.unwrap();
    store.replace_section_case_studies(section.id, &ids[1..]).await.unwrap();
    let linked = store.list_section_case_studies(section.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, ids[1]);

    let (order,): (i32,) =
        sqlx::query_as("SELECT order_index FROM section_case_studies WHERE section_id = $1")
            .bind(section.id)
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(order, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_share_token_lookup(pool: PgPool) {
    let store = store(pool).await;
    let project = store.create_project(&new_project("Demo")).await.unwrap();
    store.create_share(project.id, "abc123").await.unwrap();
    let share = store.find_share_by_token("abc123").await.unwrap().unwrap();
    assert_eq!(share.project_id, project.id);
    assert!(store.delete_share_by_project(project.id).await.unwrap());
    assert!(store.find_share_by_token("abc123").await.unwrap().is_none());
}
