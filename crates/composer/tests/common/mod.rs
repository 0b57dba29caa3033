#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use pitch_composer::projects::create_project;
use pitch_core::types::DbId;
use pitch_db::models::case_study::CreateCaseStudy;
use pitch_db::models::project::{CreateProject, Project};
use pitch_db::models::section::Section;
use pitch_db::models::team_member::CreateTeamMember;
use pitch_db::{LibraryStore, MemoryStore, PitchStore};

pub const QUIET: Duration = Duration::from_millis(1000);

/// A fresh in-memory store with one scaffolded project.
pub async fn seeded() -> (Arc<MemoryStore>, Project, Vec<Section>) {
    let store = Arc::new(MemoryStore::new());
    let (project, sections) = create_project(
        store.as_ref(),
        &CreateProject {
            title: "Sommerkampanje 2025".to_string(),
            customer_id: None,
            client_name: Some("Fjordkraft".to_string()),
        },
    )
    .await
    .unwrap();
    (store, project, sections)
}

pub fn dyn_store(store: &Arc<MemoryStore>) -> Arc<dyn PitchStore> {
    Arc::clone(store) as Arc<dyn PitchStore>
}

pub fn section_of(sections: &[Section], section_type: &str) -> DbId {
    sections
        .iter()
        .find(|s| s.section_type == section_type)
        .map(|s| s.id)
        .unwrap()
}

pub async fn case_study(store: &MemoryStore, title: &str) -> DbId {
    store
        .create_case_study(&CreateCaseStudy {
            title: title.to_string(),
            description: Some(format!("{title} beskrivelse")),
            thumbnail_path: None,
            tags: vec![],
            cta_label: None,
            cta_url: None,
        })
        .await
        .unwrap()
        .id
}

pub async fn team_member(store: &MemoryStore, name: &str) -> DbId {
    store
        .create_team_member(&CreateTeamMember {
            name: name.to_string(),
            role: Some("Produsent".to_string()),
            bio: None,
            photo_path: None,
            email: None,
            phone: None,
            tags: vec![],
        })
        .await
        .unwrap()
        .id
}
