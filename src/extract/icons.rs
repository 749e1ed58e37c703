//! Icon-font substitution.
//!
//! Icon fonts (Font Awesome and friends) render glyphs the document format
//! cannot embed, so recognized icon classes are replaced with an emoji or
//! symbol equivalent that survives as plain text. Unrecognized icons are
//! simply skipped; their empty glyph boxes carry no extractable content.

use crate::models::node::RenderedNode;

/// Known icon class to replacement glyph mappings.
const ICON_GLYPHS: &[(&str, &str)] = &[
    ("fa-plug", "\u{1F50C}"),
    ("fa-bolt", "\u{26A1}"),
    ("fa-database", "\u{1F4BE}"),
    ("fa-shield-alt", "\u{1F6E1}\u{FE0F}"),
    ("fa-shield", "\u{1F6E1}\u{FE0F}"),
    ("fa-check", "\u{2713}"),
    ("fa-check-circle", "\u{2713}"),
    ("fa-times", "\u{2717}"),
    ("fa-arrow-right", "\u{2192}"),
    ("fa-arrow-left", "\u{2190}"),
    ("fa-arrow-up", "\u{2191}"),
    ("fa-arrow-down", "\u{2193}"),
    ("fa-star", "\u{2B50}"),
    ("fa-heart", "\u{2764}\u{FE0F}"),
    ("fa-user", "\u{1F464}"),
    ("fa-users", "\u{1F465}"),
    ("fa-home", "\u{1F3E0}"),
    ("fa-envelope", "\u{2709}\u{FE0F}"),
    ("fa-phone", "\u{1F4DE}"),
    ("fa-calendar", "\u{1F4C5}"),
    ("fa-clock", "\u{1F550}"),
    ("fa-search", "\u{1F50D}"),
    ("fa-settings", "\u{2699}\u{FE0F}"),
    ("fa-cog", "\u{2699}\u{FE0F}"),
    ("fa-gear", "\u{2699}\u{FE0F}"),
];

fn glyph_for_class(class: &str) -> Option<&'static str> {
    ICON_GLYPHS
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, glyph)| *glyph)
}

/// Whether a node is an icon element: an `i` or `span` tag whose class list
/// contains an `fa-` class.
pub fn is_icon_node(node: &RenderedNode) -> bool {
    if node.tag != "i" && node.tag != "span" {
        return false;
    }
    node.attr("class")
        .map(|c| c.split_whitespace().any(|cls| cls.starts_with("fa-")))
        .unwrap_or(false)
}

/// The replacement glyph for an icon node, if one of its classes is
/// recognized. Style modifier classes (`fa-2x`, `fa-solid`) never match the
/// table, so they fall through harmlessly.
pub fn icon_glyph(node: &RenderedNode) -> Option<&'static str> {
    let classes = node.attr("class")?;
    classes.split_whitespace().find_map(glyph_for_class)
}
