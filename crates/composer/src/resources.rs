//! Resolve the library entities a page renders with.
//!
//! Read failures never block a render: they are logged and the affected
//! section falls back to empty resources.

use std::collections::HashMap;

use pitch_core::content::collage_slots;
use pitch_core::render::{
    render_page, CaseCard, RenderMode, SectionInput, SectionResources, SectionView, TeamCard,
};
use pitch_core::section_type::SectionType;
use pitch_core::types::DbId;
use pitch_db::models::case_study::CaseStudy;
use pitch_db::models::section::Section;
use pitch_db::models::team_member::TeamMember;
use pitch_db::storage::PublicUrls;
use pitch_db::PitchStore;

/// In-memory association selections that take precedence over storage.
///
/// A composer session renders its unsaved case-study and team picks.
#[derive(Debug, Clone, Default)]
pub struct SelectionOverrides<'a> {
    pub case_studies: Option<(DbId, &'a [DbId])>,
    pub team_members: Option<(DbId, &'a [DbId])>,
}

pub fn case_card(case: &CaseStudy, urls: &PublicUrls) -> CaseCard {
    CaseCard {
        id: case.id,
        title: case.title.clone(),
        description: case.description.clone(),
        thumbnail_url: case.thumbnail_path.as_deref().map(|p| urls.url_for(p)),
        cta_label: case.cta_label.clone(),
        cta_url: case.cta_url.clone(),
    }
}

pub fn team_card(member: &TeamMember, urls: &PublicUrls) -> TeamCard {
    TeamCard {
        id: member.id,
        name: member.name.clone(),
        role: member.role.clone(),
        bio: member.bio.clone(),
        photo_url: member.photo_path.as_deref().map(|p| urls.url_for(p)),
        email: member.email.clone(),
        phone: member.phone.clone(),
    }
}

pub fn section_input(section: &Section) -> SectionInput<'_> {
    SectionInput {
        id: section.id,
        section_type: &section.section_type,
        content: &section.content,
        visible: section.visible,
        order_index: section.order_index,
    }
}

/// Load resources for every section that will be rendered in `mode`.
pub async fn load_resources(
    store: &dyn PitchStore,
    urls: &PublicUrls,
    sections: &[Section],
    mode: RenderMode,
    overrides: &SelectionOverrides<'_>,
) -> HashMap<DbId, SectionResources> {
    let mut out = HashMap::new();
    for section in sections {
        if !section.visible && mode == RenderMode::View {
            continue;
        }
        let Ok(section_type) = section.section_type.parse::<SectionType>() else {
            continue;
        };
        let mut res = SectionResources::default();

        match store.list_section_images(section.id).await {
            Ok(images) => res.images = images.iter().map(|i| i.placement(urls)).collect(),
            Err(e) => tracing::warn!(section_id = section.id, error = %e, "Failed to load section images"),
        }

        match section_type {
            SectionType::Cases => {
                res.case_studies = case_studies(store, section.id, overrides)
                    .await
                    .iter()
                    .map(|c| case_card(c, urls))
                    .collect();
            }
            SectionType::Team => {
                res.team_members = team_members(store, section.id, overrides)
                    .await
                    .iter()
                    .map(|m| team_card(m, urls))
                    .collect();
            }
            SectionType::ExampleWork => {
                let ids: Vec<DbId> = collage_slots(&section.content).into_iter().flatten().collect();
                if !ids.is_empty() {
                    match store.get_images(&ids).await {
                        Ok(images) => {
                            res.image_urls = images
                                .iter()
                                .map(|i| (i.id, urls.url_for(&i.file_path)))
                                .collect();
                        }
                        Err(e) => {
                            tracing::warn!(section_id = section.id, error = %e, "Failed to load collage images")
                        }
                    }
                }
            }
            _ => {}
        }

        out.insert(section.id, res);
    }
    out
}

async fn case_studies(
    store: &dyn PitchStore,
    section_id: DbId,
    overrides: &SelectionOverrides<'_>,
) -> Vec<CaseStudy> {
    let result = match overrides.case_studies {
        Some((id, ids)) if id == section_id => resolve_each(ids, |id| store.get_case_study(id)).await,
        _ => store.list_section_case_studies(section_id).await,
    };
    result.unwrap_or_else(|e| {
        tracing::warn!(section_id, error = %e, "Failed to load case studies");
        Vec::new()
    })
}

async fn team_members(
    store: &dyn PitchStore,
    section_id: DbId,
    overrides: &SelectionOverrides<'_>,
) -> Vec<TeamMember> {
    let result = match overrides.team_members {
        Some((id, ids)) if id == section_id => resolve_each(ids, |id| store.get_team_member(id)).await,
        _ => store.list_section_team_members(section_id).await,
    };
    result.unwrap_or_else(|e| {
        tracing::warn!(section_id, error = %e, "Failed to load team members");
        Vec::new()
    })
}

/// Look up each id in order, skipping ids that no longer exist.
async fn resolve_each<T, F, Fut>(ids: &[DbId], get: F) -> pitch_db::StoreResult<Vec<T>>
where
    F: Fn(DbId) -> Fut,
    Fut: std::future::Future<Output = pitch_db::StoreResult<Option<T>>>,
{
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if let Some(row) = get(id).await? {
            out.push(row);
        }
    }
    Ok(out)
}

/// Render `sections` with their resources resolved.
pub async fn render_sections(
    store: &dyn PitchStore,
    urls: &PublicUrls,
    project_id: DbId,
    sections: &[Section],
    mode: RenderMode,
    overrides: &SelectionOverrides<'_>,
) -> Vec<SectionView> {
    let resources = load_resources(store, urls, sections, mode, overrides).await;
    let inputs: Vec<SectionInput<'_>> = sections.iter().map(section_input).collect();
    render_page(&inputs, &resources, mode, Some(project_id))
}
