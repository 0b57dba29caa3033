//! Project creation with the default section scaffold.

use pitch_core::error::CoreError;
use pitch_core::naming::slugify;
use pitch_core::section_type::SectionType;
use pitch_db::models::project::{CreateProject, NewProject, Project};
use pitch_db::models::section::{CreateSection, Section};
use pitch_db::PitchStore;
use serde_json::Value;
use validator::Validate;

use crate::error::ComposerError;

/// Create a draft project and its default sections.
///
/// The slug is derived from the title. When `client_name` is omitted it is
/// copied from the referenced customer. Sections are created one by one; a
/// failure part-way leaves the sections created so far in place.
pub async fn create_project(
    store: &dyn PitchStore,
    input: &CreateProject,
) -> Result<(Project, Vec<Section>), ComposerError> {
    input.validate().map_err(CoreError::from)?;

    let client_name = match (&input.client_name, input.customer_id) {
        (Some(name), _) if !name.trim().is_empty() => Some(name.trim().to_string()),
        (_, Some(customer_id)) => {
            let customer = store.get_customer(customer_id).await?.ok_or(CoreError::NotFound {
                entity: "Customer",
                id: customer_id,
            })?;
            Some(customer.name)
        }
        _ => None,
    };

    let project = store
        .create_project(&NewProject {
            title: input.title.trim().to_string(),
            slug: slugify(&input.title),
            client_name,
            customer_id: input.customer_id,
        })
        .await?;

    let mut sections = Vec::with_capacity(SectionType::SCAFFOLD.len());
    for (order_index, section_type) in SectionType::SCAFFOLD.iter().enumerate() {
        let section = store
            .create_section(&CreateSection {
                project_id: project.id,
                section_type: section_type.as_str().to_string(),
                content: Value::Object(Default::default()),
                visible: true,
                order_index: order_index as i32,
            })
            .await
            .map_err(|e| {
                tracing::error!(project_id = project.id, section_type = %section_type, error = %e, "Failed to scaffold section");
                e
            })?;
        sections.push(section);
    }

    tracing::info!(project_id = project.id, slug = %project.slug, sections = sections.len(), "Project created");
    Ok((project, sections))
}
