use serde::{Deserialize, Serialize};

fn default_alpha() -> f32 {
    1.0
}

/// An RGBA color. Channels are 0-255, alpha is 0.0-1.0 as observed in
/// computed CSS `rgba()` values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity from 0.0 (fully transparent) to 1.0 (fully opaque).
    #[serde(default = "default_alpha")]
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0.0 };

    /// Creates an opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Whether the color contributes anything visible when painted.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Composites this color over an opaque background, producing the solid
    /// color a viewer would actually see. Document formats have no notion of
    /// a translucent solid fill, so translucent values are flattened this way
    /// before they reach the document-assembly collaborator.
    pub fn blend_over(&self, background: Rgba) -> Rgba {
        if self.is_opaque() {
            return Rgba::rgb(self.r, self.g, self.b);
        }
        let a = f64::from(self.a);
        let blend = |fg: u8, bg: u8| -> u8 {
            (a * f64::from(fg) + (1.0 - a) * f64::from(bg)).round() as u8
        };
        Rgba::rgb(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }

    /// Perceived brightness on a 0-255 scale (ITU-R 601 luma weights).
    /// Used to pick the dominant stop of a background gradient.
    pub fn luma(&self) -> f64 {
        (f64::from(self.r) * 299.0 + f64::from(self.g) * 587.0 + f64::from(self.b) * 114.0)
            / 1000.0
    }

    /// Formats as `#RRGGBB`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A single stop of a gradient fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position of the stop along the gradient axis, normalized to 0.0-1.0.
    pub offset: f32,
    pub color: Rgba,
}

/// The geometry of a gradient fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientKind {
    /// A linear gradient. The angle is in document convention: degrees
    /// clockwise from the positive x axis (0 = left-to-right).
    Linear { angle_deg: f32 },
    /// A radial gradient from the center outward. Focal-point offsets are
    /// not preserved.
    Radial,
}

/// A normalized gradient: a kind plus an ordered stop list with offsets in
/// 0.0-1.0. Always contains at least two stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientDescriptor {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl GradientDescriptor {
    /// The darkest visible stop color, used as a solid fallback when the
    /// consumer cannot render the gradient itself.
    pub fn darkest_stop(&self) -> Option<Rgba> {
        self.stops
            .iter()
            .filter(|s| s.color.is_visible())
            .min_by(|a, b| {
                a.color
                    .luma()
                    .partial_cmp(&b.color.luma())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.color)
            .or_else(|| self.stops.first().map(|s| s.color))
    }
}

/// How an area is painted. `None` means the area is not painted at all;
/// unparseable or transparent CSS values degrade to this variant rather than
/// failing assembly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillDescriptor {
    #[default]
    None,
    Solid(Rgba),
    Gradient(GradientDescriptor),
}

impl FillDescriptor {
    /// Builds a solid fill, degrading invisible colors to `None`.
    pub fn from_color(color: Option<Rgba>) -> Self {
        match color {
            Some(c) if c.is_visible() => FillDescriptor::Solid(c),
            _ => FillDescriptor::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FillDescriptor::None)
    }

    pub fn is_visible(&self) -> bool {
        !self.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_flattens_translucency() {
        let half_black = Rgba::rgba(0, 0, 0, 0.5);
        let blended = half_black.blend_over(Rgba::WHITE);
        assert_eq!(blended, Rgba::rgb(128, 128, 128));
        assert!(blended.is_opaque());
    }

    #[test]
    fn blend_over_is_identity_for_opaque_colors() {
        let c = Rgba::rgb(10, 20, 30);
        assert_eq!(c.blend_over(Rgba::WHITE), c);
    }

    #[test]
    fn hex_formatting_ignores_alpha() {
        assert_eq!(Rgba::rgb(255, 113, 184).to_hex(), "#ff71b8");
        assert_eq!(Rgba::rgba(0, 0, 0, 0.5).to_hex(), "#000000");
    }

    #[test]
    fn invisible_colors_become_no_fill() {
        assert!(FillDescriptor::from_color(Some(Rgba::TRANSPARENT)).is_none());
        assert!(FillDescriptor::from_color(None).is_none());
        assert!(FillDescriptor::from_color(Some(Rgba::BLACK)).is_visible());
    }

    #[test]
    fn darkest_stop_prefers_low_luma() {
        let gradient = GradientDescriptor {
            kind: GradientKind::Radial,
            stops: vec![
                GradientStop { offset: 0.0, color: Rgba::rgb(250, 250, 250) },
                GradientStop { offset: 1.0, color: Rgba::rgb(20, 20, 40) },
            ],
        };
        assert_eq!(gradient.darkest_stop(), Some(Rgba::rgb(20, 20, 40)));
    }
}
