//! Section-image association model.

use pitch_core::background::ImagePlacement;
use pitch_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

use crate::storage::PublicUrls;

/// A `section_images` row joined with the image's file path.
///
/// Position columns read as `NULL` when the deployment predates them.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SectionImage {
    pub id: DbId,
    pub section_id: DbId,
    pub image_id: DbId,
    pub order_index: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub zoom: Option<f64>,
    pub file_path: String,
}

impl SectionImage {
    /// Resolve to the placement the background style is computed from.
    pub fn placement(&self, urls: &PublicUrls) -> ImagePlacement {
        ImagePlacement {
            image_id: self.image_id,
            url: urls.url_for(&self.file_path),
            order_index: self.order_index,
            position_x: self.position_x,
            position_y: self.position_y,
            zoom: self.zoom,
        }
    }
}
