use serde::{Deserialize, Serialize};

use crate::models::color::{FillDescriptor, GradientDescriptor, Rgba};
use crate::models::geometry::PxRect;

/// Horizontal text alignment, normalized from CSS `text-align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Normalizes a computed `text-align` value, resolving the logical
    /// `start`/`end` keywords against the writing direction.
    pub fn from_css(align: &str, direction: &str) -> Alignment {
        let rtl = direction.eq_ignore_ascii_case("rtl");
        match align.trim().to_ascii_lowercase().as_str() {
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            "justify" => Alignment::Justify,
            "start" if rtl => Alignment::Right,
            "end" if !rtl => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// Border line style. Anything CSS considers invisible (`none`, `hidden`)
/// never reaches this type; the style resolver drops such borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderLineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderLineStyle {
    pub fn from_css(style: &str) -> BorderLineStyle {
        match style.trim() {
            "dashed" => BorderLineStyle::Dashed,
            "dotted" => BorderLineStyle::Dotted,
            _ => BorderLineStyle::Solid,
        }
    }
}

/// A visible border on one side of a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderDescriptor {
    pub color: Rgba,
    pub width_px: f64,
    pub line_style: BorderLineStyle,
}

/// Per-side borders. CSS boxes may border only some sides (a card with a
/// colored left accent, a table row with only a bottom rule), so each side
/// is independent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideBorders {
    pub top: Option<BorderDescriptor>,
    pub right: Option<BorderDescriptor>,
    pub bottom: Option<BorderDescriptor>,
    pub left: Option<BorderDescriptor>,
}

impl SideBorders {
    pub fn any(&self) -> bool {
        self.top.is_some() || self.right.is_some() || self.bottom.is_some() || self.left.is_some()
    }

    /// The border shared by all four sides, if they are identical.
    pub fn uniform(&self) -> Option<&BorderDescriptor> {
        let first = self.top.as_ref()?;
        if self.right.as_ref() == Some(first)
            && self.bottom.as_ref() == Some(first)
            && self.left.as_ref() == Some(first)
        {
            Some(first)
        } else {
            None
        }
    }

    /// The most prominent single border, for consumers that can only draw
    /// one outline. Top wins ties.
    pub fn principal(&self) -> Option<&BorderDescriptor> {
        [&self.top, &self.right, &self.bottom, &self.left]
            .into_iter()
            .flatten()
            .max_by(|a, b| {
                a.width_px
                    .partial_cmp(&b.width_px)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn sides(&self) -> [&Option<BorderDescriptor>; 4] {
        [&self.top, &self.right, &self.bottom, &self.left]
    }
}

/// Per-corner border radius in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadius {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadius {
    pub fn uniform(px: f64) -> CornerRadius {
        CornerRadius { top_left: px, top_right: px, bottom_right: px, bottom_left: px }
    }

    pub fn max(&self) -> f64 {
        self.top_left
            .max(self.top_right)
            .max(self.bottom_right)
            .max(self.bottom_left)
    }

    pub fn is_rounded(&self) -> bool {
        self.max() > 0.0
    }
}

/// A drop shadow, kept only in the loose form CSS `box-shadow` provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset_x_px: f64,
    pub offset_y_px: f64,
    pub blur_px: f64,
    pub color: Rgba,
}

/// The normalized visual style of one rendered node, derived purely from its
/// computed style map. Identical style maps always yield identical records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    pub fill: FillDescriptor,
    pub borders: SideBorders,
    pub radius: CornerRadius,
    pub opacity: f32,
    pub shadow: Option<Shadow>,

    pub text_color: Rgba,
    /// Gradient painted through the glyphs (`background-clip: text`). When
    /// set, `text_color` is the solid fallback.
    pub text_gradient: Option<GradientDescriptor>,
    /// The observed `font-family` list, unresolved. Font substitution into
    /// the closed document set happens later so this record stays a faithful
    /// reading of the computed style.
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: u16,
    pub italic: bool,
    pub alignment: Alignment,
}

impl StyleRecord {
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }

    pub fn has_visible_fill(&self) -> bool {
        self.fill.is_visible()
    }

    pub fn has_visible_border(&self) -> bool {
        self.borders.any()
    }

    /// Whether this node paints nothing of its own (a pure layout wrapper).
    pub fn is_decorative_noop(&self) -> bool {
        !self.has_visible_fill() && !self.has_visible_border() && !self.radius.is_rounded()
    }

    /// Whether the box reads as a circle: roughly square and with a corner
    /// radius at or beyond half its smaller dimension, within the given
    /// tolerances.
    pub fn is_circular(&self, bounds: PxRect, radius_ratio: f64, aspect_min: f64, aspect_max: f64) -> bool {
        let aspect = bounds.aspect_ratio();
        aspect > aspect_min
            && aspect < aspect_max
            && self.radius.max() >= (bounds.min_dimension() / 2.0) * radius_ratio
    }
}

impl Default for StyleRecord {
    fn default() -> Self {
        StyleRecord {
            fill: FillDescriptor::None,
            borders: SideBorders::default(),
            radius: CornerRadius::default(),
            opacity: 1.0,
            shadow: None,
            text_color: Rgba::BLACK,
            text_gradient: None,
            font_family: String::new(),
            font_size_px: 16.0,
            font_weight: 400,
            italic: false,
            alignment: Alignment::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_end_resolve_against_direction() {
        assert_eq!(Alignment::from_css("start", "ltr"), Alignment::Left);
        assert_eq!(Alignment::from_css("start", "rtl"), Alignment::Right);
        assert_eq!(Alignment::from_css("end", "ltr"), Alignment::Right);
        assert_eq!(Alignment::from_css("end", "rtl"), Alignment::Left);
        assert_eq!(Alignment::from_css("center", "ltr"), Alignment::Center);
    }

    #[test]
    fn uniform_border_requires_all_sides_equal() {
        let b = BorderDescriptor {
            color: Rgba::BLACK,
            width_px: 2.0,
            line_style: BorderLineStyle::Solid,
        };
        let mut sides = SideBorders {
            top: Some(b.clone()),
            right: Some(b.clone()),
            bottom: Some(b.clone()),
            left: Some(b.clone()),
        };
        assert!(sides.uniform().is_some());
        sides.left = None;
        assert!(sides.uniform().is_none());
        assert_eq!(sides.principal(), Some(&b));
    }

    #[test]
    fn circular_requires_square_aspect_and_deep_radius() {
        let square = PxRect::new(0.0, 0.0, 100.0, 100.0);
        let style = StyleRecord {
            radius: CornerRadius::uniform(50.0),
            ..StyleRecord::default()
        };
        assert!(style.is_circular(square, 0.9, 0.8, 1.2));

        let shallow = StyleRecord {
            radius: CornerRadius::uniform(25.0),
            ..StyleRecord::default()
        };
        assert!(!shallow.is_circular(square, 0.9, 0.8, 1.2));

        let wide = PxRect::new(0.0, 0.0, 300.0, 100.0);
        assert!(!style.is_circular(wide, 0.9, 0.8, 1.2));
    }
}
