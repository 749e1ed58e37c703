//! Classification of rendered nodes into shape categories.
//!
//! Categories are checked in a fixed priority order so a node matching
//! several (an image with a background fill, a filled box with text) always
//! resolves the same way: image, table, chip, text box, geometric shape,
//! and finally drop.

use crate::extract::style;
use crate::models::node::RenderedNode;
use crate::models::shape::{GeometricKind, TriangleDirection};
use crate::models::style::StyleRecord;

/// Tolerances for the geometric heuristics. The defaults match the rendered
/// output of real slide templates; callers with unusual layouts can loosen
/// them.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Fraction of half the smaller dimension that the corner radius must
    /// reach for a box to count as a circle.
    pub circle_radius_ratio: f64,
    /// Aspect ratio band (width over height) inside which a box can count
    /// as a circle.
    pub aspect_min: f64,
    pub aspect_max: f64,
    /// Boxes smaller than this on either axis are invisible at slide scale
    /// and are dropped.
    pub min_visible_px: f64,
    /// Upper bound on either dimension for the CSS border-triangle trick;
    /// real triangles built this way are small decorations.
    pub triangle_max_px: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            circle_radius_ratio: 0.9,
            aspect_min: 0.8,
            aspect_max: 1.2,
            min_visible_px: 2.0,
            triangle_max_px: 50.0,
        }
    }
}

/// The category a node maps to, decided before any content is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Image,
    Table,
    /// A pill-shaped label: text over a fully rounded fill, kept as one
    /// composite shape.
    Chip,
    /// Text content whose whole subtree collapses into one text box.
    TextBox,
    Geometric(GeometricKind),
    /// A layout wrapper that paints nothing itself; its children are
    /// classified individually.
    Container,
    /// Nothing extractable.
    Drop,
}

/// Classifies one node. `style` must be the resolved record for `node`.
pub fn classify(
    node: &RenderedNode,
    style: &StyleRecord,
    config: &ClassifierConfig,
) -> Classification {
    if node.is_hidden() {
        return Classification::Drop;
    }
    if node.bounds.is_degenerate(config.min_visible_px) {
        // Border triangles legitimately have a zero-size content box, so
        // check for them before dropping a degenerate node.
        if let Some(direction) = triangle_direction(node, style, config) {
            return Classification::Geometric(GeometricKind::Triangle(direction));
        }
        // Zero-size boxes still anchor absolutely-positioned children, so
        // only the node's own box is dropped, not its subtree.
        if !node.children.is_empty() {
            return Classification::Container;
        }
        return Classification::Drop;
    }

    if node.is_image() {
        return Classification::Image;
    }
    // A div carrying only a CSS image background is an image in disguise,
    // as long as no text would be lost by treating it as one.
    if background_image_url(node).is_some() && !node.has_visible_text() {
        return Classification::Image;
    }
    if node.is_table() {
        return Classification::Table;
    }
    if let Some(direction) = triangle_direction(node, style, config) {
        return Classification::Geometric(GeometricKind::Triangle(direction));
    }

    let has_text = node.has_visible_text();
    if has_text {
        if is_chip(node, style, config) {
            return Classification::Chip;
        }
        // A subtree with its own styled elements cannot collapse into one
        // text box; descend and classify each child on its own.
        if has_styled_descendants(node) {
            return Classification::Container;
        }
        return Classification::TextBox;
    }

    if style.has_visible_fill() || style.has_visible_border() {
        if has_styled_descendants(node) {
            return Classification::Container;
        }
        let kind = if style.is_circular(
            node.bounds,
            config.circle_radius_ratio,
            config.aspect_min,
            config.aspect_max,
        ) {
            GeometricKind::Ellipse
        } else if style.radius.is_rounded() {
            GeometricKind::RoundedRectangle
        } else {
            GeometricKind::Rectangle
        };
        return Classification::Geometric(kind);
    }

    if !node.children.is_empty() {
        return Classification::Container;
    }
    Classification::Drop
}

/// Extracts the URL from a `background-image: url(...)` value. Gradient
/// backgrounds are fills, not images, and return `None`.
pub fn background_image_url(node: &RenderedNode) -> Option<&str> {
    let value = node.style("background-image")?;
    let start = value.find("url(")? + 4;
    let end = value[start..].find(')')? + start;
    Some(value[start..end].trim_matches(|c| c == '"' || c == '\''))
}

/// Whether any descendant paints something of its own or is an image or
/// table. Such subtrees must not be flattened into a single shape.
pub fn has_styled_descendants(node: &RenderedNode) -> bool {
    node.children.iter().any(|child| {
        if child.is_text_node() || child.is_hidden() {
            return false;
        }
        if child.is_image() || child.is_table() || background_image_url(child).is_some() {
            return true;
        }
        if !style::resolve(child).is_decorative_noop() {
            return true;
        }
        has_styled_descendants(child)
    })
}

/// Detects the CSS border-triangle trick: a small, empty, unfilled box with
/// exactly one visible border side (the others transparent). The triangle
/// points away from the opaque side.
fn triangle_direction(
    node: &RenderedNode,
    style: &StyleRecord,
    config: &ClassifierConfig,
) -> Option<TriangleDirection> {
    if node.has_visible_text() || node.is_image() || style.has_visible_fill() {
        return None;
    }
    if node.bounds.width > config.triangle_max_px || node.bounds.height > config.triangle_max_px {
        return None;
    }
    let sides = style.borders.sides();
    let visible: Vec<usize> = (0..4).filter(|&i| sides[i].is_some()).collect();
    let [only] = visible.as_slice() else {
        return None;
    };
    // The opaque border must dominate the box, otherwise this is just an
    // ordinary partial border.
    let width = sides[*only].as_ref().map(|b| b.width_px).unwrap_or(0.0);
    if width < node.bounds.min_dimension().max(1.0) / 2.0 {
        return None;
    }
    Some(match only {
        0 => TriangleDirection::Down,  // top border
        1 => TriangleDirection::Left,  // right border
        2 => TriangleDirection::Up,    // bottom border
        _ => TriangleDirection::Right, // left border
    })
}

/// Whether a text-bearing node reads as a chip: inline-only content over a
/// visible fill whose corners are rounded to at least half the box height.
fn is_chip(node: &RenderedNode, style: &StyleRecord, config: &ClassifierConfig) -> bool {
    style.has_visible_fill()
        && !node.has_block_descendants()
        && style.radius.max() >= (node.bounds.height / 2.0) * config.circle_radius_ratio
}
