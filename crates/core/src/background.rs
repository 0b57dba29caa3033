//! Background-image positioning for sections.
//!
//! Each image attached to a section may carry a stored focal point
//! (`position_x`, `position_y`, in percent) and a `zoom` multiplier. These are
//! turned into a CSS background descriptor for the page renderer.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Focal point used when no position has been stored.
pub const DEFAULT_POSITION_PCT: f64 = 50.0;

/// Largest zoom multiplier the position editor accepts.
pub const MAX_ZOOM: f64 = 5.0;

/// An image attached to a section, with its stored positioning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub image_id: DbId,
    pub url: String,
    pub order_index: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    /// `None` means "cover".
    pub zoom: Option<f64>,
}

/// CSS background properties, serialized with their JS style-object names.
///
/// All fields are `None` when no image is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<&'static str>,
}

impl BackgroundStyle {
    pub fn is_empty(&self) -> bool {
        self.background_image.is_none()
    }
}

/// Build the background style for the `image_index`-th image of a section.
///
/// `placements` may arrive in any order; they are ranked by `order_index`.
/// Returns an empty style when there is no image at that index.
pub fn background_style(placements: &[ImagePlacement], image_index: usize) -> BackgroundStyle {
    let mut ranked: Vec<&ImagePlacement> = placements.iter().collect();
    ranked.sort_by_key(|p| p.order_index);

    let Some(placement) = ranked.get(image_index) else {
        return BackgroundStyle::default();
    };

    let x = placement.position_x.unwrap_or(DEFAULT_POSITION_PCT);
    let y = placement.position_y.unwrap_or(DEFAULT_POSITION_PCT);

    BackgroundStyle {
        background_image: Some(format!("url({})", placement.url)),
        background_position: Some(format!("{}% {}%", round1(x), round1(y))),
        background_size: Some(background_size(placement.zoom)),
        background_repeat: Some("no-repeat"),
    }
}

/// `None` or `1.0` maps to `cover`; any other zoom to a percentage size.
pub fn background_size(zoom: Option<f64>) -> String {
    match zoom {
        None => "cover".to_string(),
        Some(z) if (z - 1.0).abs() < f64::EPSILON => "cover".to_string(),
        Some(z) => format!("{}%", round1(z * 100.0)),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// A validated background position ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPosition {
    pub x: f64,
    pub y: f64,
    pub zoom: Option<f64>,
}

impl BackgroundPosition {
    /// Clamp the focal point to 0..=100 and check the zoom multiplier.
    pub fn new(x: f64, y: f64, zoom: Option<f64>) -> Result<Self, CoreError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::Validation(
                "Background position must be a finite number".to_string(),
            ));
        }
        if let Some(z) = zoom {
            if !z.is_finite() || z <= 0.0 || z > MAX_ZOOM {
                return Err(CoreError::Validation(format!(
                    "Zoom must be greater than 0 and at most {MAX_ZOOM}, got {z}"
                )));
            }
        }
        Ok(Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
            zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(id: DbId, order: i32, x: Option<f64>, y: Option<f64>, zoom: Option<f64>) -> ImagePlacement {
        ImagePlacement {
            image_id: id,
            url: format!("https://cdn.test/{id}.jpg"),
            order_index: order,
            position_x: x,
            position_y: y,
            zoom,
        }
    }

    #[test]
    fn no_images_gives_empty_style() {
        let style = background_style(&[], 0);
        assert!(style.is_empty());
        assert_eq!(serde_json::to_value(&style).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn unset_position_is_centered_cover() {
        let style = background_style(&[placement(1, 0, None, None, None)], 0);
        assert_eq!(style.background_image.as_deref(), Some("url(https://cdn.test/1.jpg)"));
        assert_eq!(style.background_position.as_deref(), Some("50% 50%"));
        assert_eq!(style.background_size.as_deref(), Some("cover"));
    }

    #[test]
    fn zoom_of_one_is_cover() {
        assert_eq!(background_size(Some(1.0)), "cover");
        assert_eq!(background_size(None), "cover");
    }

    #[test]
    fn other_zoom_is_percentage() {
        assert_eq!(background_size(Some(1.5)), "150%");
        assert_eq!(background_size(Some(1.1)), "110%");
        assert_eq!(background_size(Some(0.75)), "75%");
    }

    #[test]
    fn index_follows_order_index_not_slice_order() {
        let images = [
            placement(2, 1, Some(10.0), Some(20.0), Some(2.0)),
            placement(1, 0, None, None, None),
        ];
        let first = background_style(&images, 0);
        assert_eq!(first.background_image.as_deref(), Some("url(https://cdn.test/1.jpg)"));
        let second = background_style(&images, 1);
        assert_eq!(second.background_position.as_deref(), Some("10% 20%"));
        assert_eq!(second.background_size.as_deref(), Some("200%"));
        assert!(background_style(&images, 2).is_empty());
    }

    #[test]
    fn style_serializes_with_css_property_names() {
        let style = background_style(&[placement(1, 0, None, None, None)], 0);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["backgroundSize"], "cover");
        assert_eq!(json["backgroundRepeat"], "no-repeat");
    }

    #[test]
    fn position_is_clamped() {
        let pos = BackgroundPosition::new(-5.0, 140.0, None).unwrap();
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.y, 100.0);
    }

    #[test]
    fn invalid_zoom_is_rejected() {
        assert!(BackgroundPosition::new(50.0, 50.0, Some(0.0)).is_err());
        assert!(BackgroundPosition::new(50.0, 50.0, Some(-1.0)).is_err());
        assert!(BackgroundPosition::new(50.0, 50.0, Some(MAX_ZOOM + 1.0)).is_err());
        assert!(BackgroundPosition::new(f64::NAN, 50.0, None).is_err());
        assert!(BackgroundPosition::new(50.0, 50.0, Some(1.25)).is_ok());
    }
}
