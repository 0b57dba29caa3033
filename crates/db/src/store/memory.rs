//! In-process storage client.
//!
//! Mirrors the Postgres schema's observable rules (ordering, uniqueness,
//! association replacement) closely enough for the composer and HTTP layers
//! to be exercised without a database. With the `test-util` feature, failure
//! injection hooks let tests simulate backend write failures.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pitch_core::generation::top_examples;
use pitch_core::section_type::SectionType;
use pitch_core::types::DbId;
use sqlx::types::Json;

use super::{
    AnalyticsStore, LibraryStore, ProjectStore, SectionStore, ShareStore, StoreError, StoreResult,
};
use crate::models::ai_example::{AiExample, AiExampleFilter, CreateAiExample, UpdateAiExample};
use crate::models::analytics::{AnalyticsSession, SessionWrite};
use crate::models::case_study::{CaseStudy, CreateCaseStudy, UpdateCaseStudy};
use crate::models::collage_preset::{CollagePreset, CreateCollagePreset, UpdateCollagePreset};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::image::{CreateImage, Image, ImageFilter, UpdateImage};
use crate::models::project::{NewProject, Project, UpdateProject};
use crate::models::project_share::ProjectShare;
use crate::models::quote::{AcceptQuote, Contract, Quote};
use crate::models::section::{CreateSection, Section, SectionWrite};
use crate::models::section_image::SectionImage;
use crate::models::status::{ProjectStatus, SignatureStatus, StatusId};
use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};

#[derive(Debug, Clone)]
struct ImageLink {
    id: DbId,
    section_id: DbId,
    image_id: DbId,
    order_index: i32,
    position_x: Option<f64>,
    position_y: Option<f64>,
    zoom: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct JoinRow {
    section_id: DbId,
    target_id: DbId,
    order_index: i32,
}

#[derive(Default)]
struct Tables {
    projects: BTreeMap<DbId, Project>,
    sections: BTreeMap<DbId, Section>,
    section_images: Vec<ImageLink>,
    section_case_studies: Vec<JoinRow>,
    section_team_members: Vec<JoinRow>,
    customers: BTreeMap<DbId, Customer>,
    case_studies: BTreeMap<DbId, CaseStudy>,
    team_members: BTreeMap<DbId, TeamMember>,
    images: BTreeMap<DbId, Image>,
    collage_presets: BTreeMap<DbId, CollagePreset>,
    ai_examples: BTreeMap<DbId, AiExample>,
    shares: BTreeMap<DbId, ProjectShare>,
    quotes: BTreeMap<DbId, Quote>,
    contracts: BTreeMap<DbId, Contract>,
    analytics: BTreeMap<DbId, AnalyticsSession>,
}

/// Simulated write failures and write counters.
#[cfg(any(test, feature = "test-util"))]
#[derive(Default)]
struct FaultHooks {
    fail_writes: std::sync::atomic::AtomicBool,
    failing_sections: Mutex<std::collections::HashSet<DbId>>,
    section_saves: std::sync::atomic::AtomicUsize,
    project_touches: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-util"))]
impl FaultHooks {
    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write failure".to_string()));
        }
        Ok(())
    }

    fn check_section(&self, id: DbId) -> StoreResult<()> {
        self.hooks.check_section(id)?;
        Ok(())
    }

    fn section_saved(&self) {
        self.hooks.section_saved();
    }

    fn project_touched(&self) {
        self.hooks.project_touched();
    }
}

#[cfg(not(any(test, feature = "test-util")))]
#[derive(Default)]
struct FaultHooks;

#[cfg(not(any(test, feature = "test-util")))]
impl FaultHooks {
    fn check_write(&self) -> StoreResult<()> {
        Ok(())
    }

    fn check_section(&self, _id: DbId) -> StoreResult<()> {
        Ok(())
    }

    fn section_saved(&self) {}

    fn project_touched(&self) {}
}

/// Storage client backed by process memory.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    next_id: AtomicI64,
    image_positions: bool,
    hooks: FaultHooks,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_image_positions(true)
    }

    /// A store that behaves like a database without the position columns
    /// when `supported` is false.
    pub fn with_image_positions(supported: bool) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            next_id: AtomicI64::new(1),
            image_positions: supported,
            hooks: FaultHooks::default(),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }

    fn next_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check_write(&self) -> StoreResult<()> {
        self.hooks.check_write()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryStore {
    /// Make every write fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.hooks.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes to one section fail.
    pub fn fail_section_writes(&self, section_id: DbId) {
        lock(&self.hooks.failing_sections).insert(section_id);
    }

    /// Number of successful section writes so far.
    pub fn section_saves(&self) -> usize {
        self.hooks.section_saves.load(Ordering::SeqCst)
    }

    /// Number of successful `touch_project` calls so far.
    pub fn project_touches(&self) -> usize {
        self.hooks.project_touches.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *slot = Some(v.clone());
    }
}

/// Delete-all then insert, checking every target exists.
fn replace_join(
    rows: &mut Vec<JoinRow>,
    section_id: DbId,
    ids: &[DbId],
    exists: impl Fn(DbId) -> bool,
    entity: &'static str,
) -> StoreResult<()> {
    rows.retain(|r| r.section_id != section_id);
    for (order, &target_id) in ids.iter().enumerate() {
        if !exists(target_id) {
            return Err(StoreError::NotFound { entity, id: target_id });
        }
        rows.push(JoinRow {
            section_id,
            target_id,
            order_index: order as i32,
        });
    }
    Ok(())
}

fn joined<T: Clone>(rows: &[JoinRow], section_id: DbId, table: &BTreeMap<DbId, T>) -> Vec<T> {
    let mut links: Vec<&JoinRow> = rows.iter().filter(|r| r.section_id == section_id).collect();
    links.sort_by_key(|r| r.order_index);
    links
        .into_iter()
        .filter_map(|r| table.get(&r.target_id).cloned())
        .collect()
}

/* --------------------------------------------------------------------------
   Projects
   -------------------------------------------------------------------------- */

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, input: &NewProject) -> StoreResult<Project> {
        self.check_write()?;
        let now = Utc::now();
        let project = Project {
            id: self.next_id(),
            title: input.title.clone(),
            slug: input.slug.clone(),
            client_name: input.client_name.clone(),
            customer_id: input.customer_id,
            status_id: ProjectStatus::Draft.id(),
            created_at: now,
            updated_at: now,
        };
        self.tables().projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.tables().projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.tables().projects.values().cloned().collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut project.title, &input.title);
        set_opt(&mut project.client_name, &input.client_name);
        set_opt(&mut project.customer_id, &input.customer_id);
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn set_project_status(&self, id: DbId, status_id: StatusId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(false);
        };
        project.status_id = status_id;
        project.updated_at = Utc::now();
        Ok(true)
    }

    async fn touch_project(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(false);
        };
        project.updated_at = Utc::now();
        self.hooks.project_touched();
        Ok(true)
    }
}

/* --------------------------------------------------------------------------
   Sections and associations
   -------------------------------------------------------------------------- */

#[async_trait]
impl SectionStore for MemoryStore {
    async fn create_section(&self, input: &CreateSection) -> StoreResult<Section> {
        self.check_write()?;
        let mut tables = self.tables();
        if !tables.projects.contains_key(&input.project_id) {
            return Err(StoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            });
        }
        if input.section_type == SectionType::Quote.as_str()
            && tables
                .sections
                .values()
                .any(|s| s.project_id == input.project_id && s.section_type == input.section_type)
        {
            return Err(StoreError::Conflict("uq_sections_project_quote".to_string()));
        }
        let now = Utc::now();
        let section = Section {
            id: self.next_id(),
            project_id: input.project_id,
            section_type: input.section_type.clone(),
            content: input.content.clone(),
            visible: input.visible,
            order_index: input.order_index,
            created_at: now,
            updated_at: now,
        };
        tables.sections.insert(section.id, section.clone());
        Ok(section)
    }

    async fn get_section(&self, id: DbId) -> StoreResult<Option<Section>> {
        Ok(self.tables().sections.get(&id).cloned())
    }

    async fn list_sections(&self, project_id: DbId) -> StoreResult<Vec<Section>> {
        let mut sections: Vec<Section> = self
            .tables()
            .sections
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| (s.order_index, s.id));
        Ok(sections)
    }

    async fn save_section(&self, id: DbId, input: &SectionWrite) -> StoreResult<bool> {
        self.check_write()?;
        self.hooks.check_section(id)?;
        let mut tables = self.tables();
        let Some(section) = tables.sections.get_mut(&id) else {
            return Ok(false);
        };
        section.content = input.content.clone();
        section.visible = input.visible;
        section.order_index = input.order_index;
        section.updated_at = Utc::now();
        self.hooks.section_saved();
        Ok(true)
    }

    async fn delete_section(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        let removed = tables.sections.remove(&id).is_some();
        tables.section_images.retain(|r| r.section_id != id);
        tables.section_case_studies.retain(|r| r.section_id != id);
        tables.section_team_members.retain(|r| r.section_id != id);
        Ok(removed)
    }

    async fn list_section_images(&self, section_id: DbId) -> StoreResult<Vec<SectionImage>> {
        let tables = self.tables();
        let mut links: Vec<&ImageLink> = tables
            .section_images
            .iter()
            .filter(|l| l.section_id == section_id)
            .collect();
        links.sort_by_key(|l| (l.order_index, l.id));
        Ok(links
            .into_iter()
            .filter_map(|l| {
                let image = tables.images.get(&l.image_id)?;
                let (position_x, position_y, zoom) = if self.image_positions {
                    (l.position_x, l.position_y, l.zoom)
                } else {
                    (None, None, None)
                };
                Some(SectionImage {
                    id: l.id,
                    section_id: l.section_id,
                    image_id: l.image_id,
                    order_index: l.order_index,
                    position_x,
                    position_y,
                    zoom,
                    file_path: image.file_path.clone(),
                })
            })
            .collect())
    }

    async fn replace_section_images(&self, section_id: DbId, image_ids: &[DbId]) -> StoreResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.section_images.retain(|l| l.section_id != section_id);
        for (order, &image_id) in image_ids.iter().enumerate() {
            if !tables.images.contains_key(&image_id) {
                return Err(StoreError::NotFound {
                    entity: "Image",
                    id: image_id,
                });
            }
            let id = self.next_id();
            tables.section_images.push(ImageLink {
                id,
                section_id,
                image_id,
                order_index: order as i32,
                position_x: None,
                position_y: None,
                zoom: None,
            });
        }
        Ok(())
    }

    async fn save_image_position(
        &self,
        section_id: DbId,
        image_id: DbId,
        x: f64,
        y: f64,
        zoom: Option<f64>,
    ) -> StoreResult<bool> {
        if !self.image_positions {
            return Err(StoreError::SchemaDrift(
                "section_images position columns do not exist".to_string(),
            ));
        }
        self.check_write()?;
        let mut tables = self.tables();
        let mut updated = false;
        for link in tables
            .section_images
            .iter_mut()
            .filter(|l| l.section_id == section_id && l.image_id == image_id)
        {
            link.position_x = Some(x);
            link.position_y = Some(y);
            link.zoom = zoom;
            updated = true;
        }
        Ok(updated)
    }

    fn supports_image_positions(&self) -> bool {
        self.image_positions
    }

    async fn list_section_case_studies(&self, section_id: DbId) -> StoreResult<Vec<CaseStudy>> {
        let tables = self.tables();
        Ok(joined(&tables.section_case_studies, section_id, &tables.case_studies))
    }

    async fn replace_section_case_studies(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()> {
        self.check_write()?;
        let mut guard = self.tables();
        let tables = &mut *guard;
        let library = &tables.case_studies;
        replace_join(
            &mut tables.section_case_studies,
            section_id,
            ids,
            |id| library.contains_key(&id),
            "CaseStudy",
        )
    }

    async fn list_section_team_members(&self, section_id: DbId) -> StoreResult<Vec<TeamMember>> {
        let tables = self.tables();
        Ok(joined(&tables.section_team_members, section_id, &tables.team_members))
    }

    async fn replace_section_team_members(&self, section_id: DbId, ids: &[DbId]) -> StoreResult<()> {
        self.check_write()?;
        let mut guard = self.tables();
        let tables = &mut *guard;
        let library = &tables.team_members;
        replace_join(
            &mut tables.section_team_members,
            section_id,
            ids,
            |id| library.contains_key(&id),
            "TeamMember",
        )
    }
}

/* --------------------------------------------------------------------------
   Library
   -------------------------------------------------------------------------- */

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn create_customer(&self, input: &CreateCustomer) -> StoreResult<Customer> {
        self.check_write()?;
        let now = Utc::now();
        let row = Customer {
            id: self.next_id(),
            name: input.name.clone(),
            contact_person: input.contact_person.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            org_number: input.org_number.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables().customers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_customer(&self, id: DbId) -> StoreResult<Option<Customer>> {
        Ok(self.tables().customers.get(&id).cloned())
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let mut rows: Vec<Customer> = self.tables().customers.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_customer(&self, id: DbId, input: &UpdateCustomer) -> StoreResult<Option<Customer>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(row) = tables.customers.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut row.name, &input.name);
        set_opt(&mut row.contact_person, &input.contact_person);
        set_opt(&mut row.email, &input.email);
        set_opt(&mut row.phone, &input.phone);
        set_opt(&mut row.org_number, &input.org_number);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_customer(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        let removed = tables.customers.remove(&id).is_some();
        // ON DELETE SET NULL
        for project in tables.projects.values_mut() {
            if project.customer_id == Some(id) {
                project.customer_id = None;
            }
        }
        Ok(removed)
    }

    async fn create_case_study(&self, input: &CreateCaseStudy) -> StoreResult<CaseStudy> {
        self.check_write()?;
        let now = Utc::now();
        let row = CaseStudy {
            id: self.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            thumbnail_path: input.thumbnail_path.clone(),
            tags: input.tags.clone(),
            cta_label: input.cta_label.clone(),
            cta_url: input.cta_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables().case_studies.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_case_study(&self, id: DbId) -> StoreResult<Option<CaseStudy>> {
        Ok(self.tables().case_studies.get(&id).cloned())
    }

    async fn list_case_studies(&self) -> StoreResult<Vec<CaseStudy>> {
        Ok(self.tables().case_studies.values().rev().cloned().collect())
    }

    async fn update_case_study(&self, id: DbId, input: &UpdateCaseStudy) -> StoreResult<Option<CaseStudy>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(row) = tables.case_studies.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut row.title, &input.title);
        set_opt(&mut row.description, &input.description);
        set_opt(&mut row.thumbnail_path, &input.thumbnail_path);
        set(&mut row.tags, &input.tags);
        set_opt(&mut row.cta_label, &input.cta_label);
        set_opt(&mut row.cta_url, &input.cta_url);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_case_study(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.section_case_studies.retain(|r| r.target_id != id);
        Ok(tables.case_studies.remove(&id).is_some())
    }

    async fn create_team_member(&self, input: &CreateTeamMember) -> StoreResult<TeamMember> {
        self.check_write()?;
        let now = Utc::now();
        let row = TeamMember {
            id: self.next_id(),
            name: input.name.clone(),
            role: input.role.clone(),
            bio: input.bio.clone(),
            photo_path: input.photo_path.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables().team_members.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_team_member(&self, id: DbId) -> StoreResult<Option<TeamMember>> {
        Ok(self.tables().team_members.get(&id).cloned())
    }

    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        let mut rows: Vec<TeamMember> = self.tables().team_members.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_team_member(&self, id: DbId, input: &UpdateTeamMember) -> StoreResult<Option<TeamMember>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(row) = tables.team_members.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut row.name, &input.name);
        set_opt(&mut row.role, &input.role);
        set_opt(&mut row.bio, &input.bio);
        set_opt(&mut row.photo_path, &input.photo_path);
        set_opt(&mut row.email, &input.email);
        set_opt(&mut row.phone, &input.phone);
        set(&mut row.tags, &input.tags);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_team_member(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.section_team_members.retain(|r| r.target_id != id);
        Ok(tables.team_members.remove(&id).is_some())
    }

    async fn create_image(&self, input: &CreateImage) -> StoreResult<Image> {
        self.check_write()?;
        let now = Utc::now();
        let row = Image {
            id: self.next_id(),
            file_path: input.file_path.clone(),
            title: input.title.clone(),
            category: input.category.clone(),
            tags: input.tags.clone(),
            width: input.width,
            height: input.height,
            created_at: now,
            updated_at: now,
        };
        self.tables().images.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_image(&self, id: DbId) -> StoreResult<Option<Image>> {
        Ok(self.tables().images.get(&id).cloned())
    }

    async fn get_images(&self, ids: &[DbId]) -> StoreResult<Vec<Image>> {
        let tables = self.tables();
        Ok(ids.iter().filter_map(|id| tables.images.get(id).cloned()).collect())
    }

    async fn list_images(&self, filter: &ImageFilter) -> StoreResult<Vec<Image>> {
        Ok(self
            .tables()
            .images
            .values()
            .rev()
            .filter(|i| i.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_image(&self, id: DbId, input: &UpdateImage) -> StoreResult<Option<Image>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(row) = tables.images.get_mut(&id) else {
            return Ok(None);
        };
        set_opt(&mut row.title, &input.title);
        set_opt(&mut row.category, &input.category);
        set(&mut row.tags, &input.tags);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_image(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        if tables.collage_presets.values().any(|p| p.slots().contains(&id)) {
            return Err(StoreError::Conflict(format!("image {id} is used by a collage preset")));
        }
        tables.section_images.retain(|l| l.image_id != id);
        Ok(tables.images.remove(&id).is_some())
    }

    async fn create_collage_preset(&self, input: &CreateCollagePreset) -> StoreResult<CollagePreset> {
        self.check_write()?;
        let mut tables = self.tables();
        for id in [input.pos1, input.pos2, input.pos3, input.pos4, input.pos5] {
            if !tables.images.contains_key(&id) {
                return Err(StoreError::NotFound { entity: "Image", id });
            }
        }
        let now = Utc::now();
        let row = CollagePreset {
            id: self.next_id(),
            name: input.name.clone(),
            keywords: input.keywords.clone(),
            pos1: input.pos1,
            pos2: input.pos2,
            pos3: input.pos3,
            pos4: input.pos4,
            pos5: input.pos5,
            created_at: now,
            updated_at: now,
        };
        tables.collage_presets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_collage_preset(&self, id: DbId) -> StoreResult<Option<CollagePreset>> {
        Ok(self.tables().collage_presets.get(&id).cloned())
    }

    async fn list_collage_presets(&self) -> StoreResult<Vec<CollagePreset>> {
        let mut rows: Vec<CollagePreset> = self.tables().collage_presets.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_collage_preset(
        &self,
        id: DbId,
        input: &UpdateCollagePreset,
    ) -> StoreResult<Option<CollagePreset>> {
        self.check_write()?;
        let mut tables = self.tables();
        for image_id in [input.pos1, input.pos2, input.pos3, input.pos4, input.pos5]
            .into_iter()
            .flatten()
        {
            if !tables.images.contains_key(&image_id) {
                return Err(StoreError::NotFound {
                    entity: "Image",
                    id: image_id,
                });
            }
        }
        let Some(row) = tables.collage_presets.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut row.name, &input.name);
        set(&mut row.keywords, &input.keywords);
        set(&mut row.pos1, &input.pos1);
        set(&mut row.pos2, &input.pos2);
        set(&mut row.pos3, &input.pos3);
        set(&mut row.pos4, &input.pos4);
        set(&mut row.pos5, &input.pos5);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_collage_preset(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        Ok(self.tables().collage_presets.remove(&id).is_some())
    }

    async fn create_ai_example(&self, input: &CreateAiExample) -> StoreResult<AiExample> {
        self.check_write()?;
        let now = Utc::now();
        let row = AiExample {
            id: self.next_id(),
            section_type: input.section_type.clone(),
            project_type: input.project_type.clone(),
            text: input.text.clone(),
            quality_score: input.quality_score,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.tables().ai_examples.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_ai_example(&self, id: DbId) -> StoreResult<Option<AiExample>> {
        Ok(self.tables().ai_examples.get(&id).cloned())
    }

    async fn list_ai_examples(&self, filter: &AiExampleFilter) -> StoreResult<Vec<AiExample>> {
        let mut rows: Vec<AiExample> = self
            .tables()
            .ai_examples
            .values()
            .filter(|e| filter.section_type.as_ref().map_or(true, |t| &e.section_type == t))
            .filter(|e| filter.project_type.as_ref().map_or(true, |t| &e.project_type == t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
        Ok(rows)
    }

    async fn top_ai_examples(&self, section_type: &str, project_type: &str) -> StoreResult<Vec<AiExample>> {
        let matching: Vec<AiExample> = self
            .tables()
            .ai_examples
            .values()
            .filter(|e| e.section_type == section_type && e.project_type == project_type)
            .cloned()
            .collect();
        Ok(top_examples(matching, |e| e.quality_score))
    }

    async fn update_ai_example(&self, id: DbId, input: &UpdateAiExample) -> StoreResult<Option<AiExample>> {
        self.check_write()?;
        let mut tables = self.tables();
        let Some(row) = tables.ai_examples.get_mut(&id) else {
            return Ok(None);
        };
        set(&mut row.section_type, &input.section_type);
        set(&mut row.project_type, &input.project_type);
        set(&mut row.text, &input.text);
        set(&mut row.quality_score, &input.quality_score);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn increment_ai_example_usage(&self, ids: &[DbId]) -> StoreResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        for id in ids {
            if let Some(row) = tables.ai_examples.get_mut(id) {
                row.usage_count += 1;
            }
        }
        Ok(())
    }

    async fn delete_ai_example(&self, id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        Ok(self.tables().ai_examples.remove(&id).is_some())
    }
}

/* --------------------------------------------------------------------------
   Shares and quotes
   -------------------------------------------------------------------------- */

#[async_trait]
impl ShareStore for MemoryStore {
    async fn create_share(&self, project_id: DbId, token: &str) -> StoreResult<ProjectShare> {
        self.check_write()?;
        let mut tables = self.tables();
        if tables.shares.values().any(|s| s.project_id == project_id) {
            return Err(StoreError::Conflict("uq_project_shares_project_id".to_string()));
        }
        if tables.shares.values().any(|s| s.token == token) {
            return Err(StoreError::Conflict("uq_project_shares_token".to_string()));
        }
        let share = ProjectShare {
            id: self.next_id(),
            project_id,
            token: token.to_string(),
            created_at: Utc::now(),
        };
        tables.shares.insert(share.id, share.clone());
        Ok(share)
    }

    async fn find_share_by_project(&self, project_id: DbId) -> StoreResult<Option<ProjectShare>> {
        Ok(self
            .tables()
            .shares
            .values()
            .find(|s| s.project_id == project_id)
            .cloned())
    }

    async fn find_share_by_token(&self, token: &str) -> StoreResult<Option<ProjectShare>> {
        Ok(self.tables().shares.values().find(|s| s.token == token).cloned())
    }

    async fn delete_share_by_project(&self, project_id: DbId) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables();
        let before = tables.shares.len();
        tables.shares.retain(|_, s| s.project_id != project_id);
        Ok(tables.shares.len() < before)
    }

    async fn create_quote(&self, project_id: DbId, input: &AcceptQuote) -> StoreResult<Quote> {
        self.check_write()?;
        let mut tables = self.tables();
        if tables.quotes.values().any(|q| q.project_id == project_id) {
            return Err(StoreError::Conflict("uq_quotes_project_id".to_string()));
        }
        let quote = Quote {
            id: self.next_id(),
            project_id,
            pricing: input.pricing.clone(),
            sheet_reference: input.sheet_reference.clone(),
            accepted_by_name: input.accepted_by_name.clone(),
            accepted_by_email: input.accepted_by_email.clone(),
            created_at: Utc::now(),
        };
        tables.quotes.insert(quote.id, quote.clone());
        Ok(quote)
    }

    async fn get_quote(&self, id: DbId) -> StoreResult<Option<Quote>> {
        Ok(self.tables().quotes.get(&id).cloned())
    }

    async fn find_quote_by_project(&self, project_id: DbId) -> StoreResult<Option<Quote>> {
        Ok(self
            .tables()
            .quotes
            .values()
            .find(|q| q.project_id == project_id)
            .cloned())
    }

    async fn create_contract(&self, quote_id: DbId) -> StoreResult<Contract> {
        self.check_write()?;
        let mut tables = self.tables();
        if !tables.quotes.contains_key(&quote_id) {
            return Err(StoreError::NotFound {
                entity: "Quote",
                id: quote_id,
            });
        }
        let now = Utc::now();
        let contract = Contract {
            id: self.next_id(),
            quote_id,
            signature_status_id: SignatureStatus::Pending.id(),
            contract_pdf_path: None,
            quote_pdf_path: None,
            created_at: now,
            updated_at: now,
        };
        tables.contracts.insert(contract.id, contract.clone());
        Ok(contract)
    }
}

/* --------------------------------------------------------------------------
   Analytics
   -------------------------------------------------------------------------- */

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn find_analytics_session(
        &self,
        scope: &str,
        scope_id: DbId,
        session_id: &str,
    ) -> StoreResult<Option<AnalyticsSession>> {
        Ok(self
            .tables()
            .analytics
            .values()
            .find(|s| s.scope == scope && s.scope_id == scope_id && s.session_id == session_id)
            .cloned())
    }

    async fn upsert_analytics_session(&self, input: &SessionWrite) -> StoreResult<AnalyticsSession> {
        self.check_write()?;
        let mut tables = self.tables();
        let now = Utc::now();
        let existing = tables.analytics.values_mut().find(|s| {
            s.scope == input.scope && s.scope_id == input.scope_id && s.session_id == input.session_id
        });
        if let Some(row) = existing {
            row.ended_at = input.state.ended_at;
            row.duration_ms = input.duration_ms();
            row.sections = Json(input.state.sections.clone());
            row.updated_at = now;
            return Ok(row.clone());
        }
        let row = AnalyticsSession {
            id: self.next_id(),
            scope: input.scope.clone(),
            scope_id: input.scope_id,
            session_id: input.session_id.clone(),
            started_at: input.state.started_at,
            ended_at: input.state.ended_at,
            duration_ms: input.duration_ms(),
            sections: Json(input.state.sections.clone()),
            updated_at: now,
        };
        tables.analytics.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_analytics_sessions(&self, scope: &str, scope_id: DbId) -> StoreResult<Vec<AnalyticsSession>> {
        let mut rows: Vec<AnalyticsSession> = self
            .tables()
            .analytics
            .values()
            .filter(|s| s.scope == scope && s.scope_id == scope_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.started_at);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    async fn project(store: &MemoryStore) -> Project {
        store
            .create_project(&NewProject {
                title: "Kampanje".into(),
                slug: "kampanje".into(),
                client_name: None,
                customer_id: None,
            })
            .await
            .unwrap()
    }

    async fn section(store: &MemoryStore, project_id: DbId, t: &str, order: i32) -> Section {
        store
            .create_section(&CreateSection {
                project_id,
                section_type: t.into(),
                content: json!({}),
                visible: true,
                order_index: order,
            })
            .await
            .unwrap()
    }

    async fn case_study(store: &MemoryStore, title: &str) -> CaseStudy {
        store
            .create_case_study(&CreateCaseStudy {
                title: title.into(),
                description: None,
                thumbnail_path: None,
                tags: vec![],
                cta_label: None,
                cta_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn sections_list_in_order() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        let b = section(&store, p.id, "goal", 1).await;
        let a = section(&store, p.id, "hero", 0).await;
        let ids: Vec<DbId> = store.list_sections(p.id).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn second_quote_section_conflicts() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        section(&store, p.id, "quote", 0).await;
        let err = store
            .create_section(&CreateSection {
                project_id: p.id,
                section_type: "quote".into(),
                content: json!({}),
                visible: true,
                order_index: 1,
            })
            .await;
        assert_matches!(err, Err(StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn case_study_selection_is_fully_replaced() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        let s = section(&store, p.id, "cases", 0).await;
        let a = case_study(&store, "A").await;
        let b = case_study(&store, "B").await;

        store.replace_section_case_studies(s.id, &[a.id, b.id]).await.unwrap();
        store.replace_section_case_studies(s.id, &[b.id]).await.unwrap();
        let linked = store.list_section_case_studies(s.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, b.id);

        store.replace_section_case_studies(s.id, &[]).await.unwrap();
        assert!(store.list_section_case_studies(s.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_case_study_is_rejected() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        let s = section(&store, p.id, "cases", 0).await;
        let err = store.replace_section_case_studies(s.id, &[999]).await;
        assert_matches!(err, Err(StoreError::NotFound { entity: "CaseStudy", id: 999 }));
    }

    #[tokio::test]
    async fn positions_without_columns_are_schema_drift() {
        let store = MemoryStore::with_image_positions(false);
        assert!(!store.supports_image_positions());
        let err = store.save_image_position(1, 2, 50.0, 50.0, None).await;
        assert_matches!(err, Err(StoreError::SchemaDrift(_)));
    }

    #[tokio::test]
    async fn failure_injection_applies_to_writes_only() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        store.set_fail_writes(true);
        assert_matches!(store.touch_project(p.id).await, Err(StoreError::Unavailable(_)));
        assert!(store.get_project(p.id).await.unwrap().is_some());
        store.set_fail_writes(false);
        assert!(store.touch_project(p.id).await.unwrap());
        assert_eq!(store.project_touches(), 1);
    }

    #[tokio::test]
    async fn share_is_unique_per_project() {
        let store = MemoryStore::new();
        let p = project(&store).await;
        store.create_share(p.id, "tok1").await.unwrap();
        assert_matches!(store.create_share(p.id, "tok2").await, Err(StoreError::Conflict(_)));
        assert!(store.delete_share_by_project(p.id).await.unwrap());
        assert!(store.find_share_by_token("tok1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn top_examples_rank_by_score() {
        let store = MemoryStore::new();
        for score in [3, 9, 5, 10, 1, 7, 8] {
            store
                .create_ai_example(&CreateAiExample {
                    section_type: "goal".into(),
                    project_type: "film".into(),
                    text: format!("example {score}"),
                    quality_score: score,
                })
                .await
                .unwrap();
        }
        let top = store.top_ai_examples("goal", "film").await.unwrap();
        let scores: Vec<i16> = top.iter().map(|e| e.quality_score).collect();
        assert_eq!(scores, vec![10, 9, 8, 7, 5]);
        assert!(store.top_ai_examples("goal", "foto").await.unwrap().is_empty());
    }
}
