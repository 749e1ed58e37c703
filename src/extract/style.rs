//! Resolution of a node's computed style map into a [`StyleRecord`].
//!
//! This is a pure reading of the computed values the rendering collaborator
//! reports. No cascade or inheritance happens here; the browser already did
//! that. Unparseable values degrade to their absent form rather than
//! erroring, so one bad property can never sink a slide.

use crate::extract::units::{css_value_to_fill, parse_css_color, parse_css_gradient, parse_px};
use crate::models::color::{FillDescriptor, Rgba};
use crate::models::node::RenderedNode;
use crate::models::style::{
    Alignment, BorderDescriptor, BorderLineStyle, CornerRadius, Shadow, SideBorders, StyleRecord,
};

/// Resolves the visual style of one rendered node.
pub fn resolve(node: &RenderedNode) -> StyleRecord {
    let fill = resolve_fill(node);
    let text_gradient = resolve_text_gradient(node);

    StyleRecord {
        fill,
        borders: resolve_borders(node),
        radius: resolve_radius(node),
        opacity: node
            .style("opacity")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0),
        shadow: resolve_shadow(node),
        text_color: node
            .style("color")
            .and_then(parse_css_color)
            .unwrap_or(Rgba::BLACK),
        text_gradient,
        font_family: node.style("font-family").unwrap_or("").to_string(),
        font_size_px: match node.style("font-size").map(parse_px) {
            Some(px) if px > 0.0 => px,
            _ => StyleRecord::default().font_size_px,
        },
        font_weight: resolve_weight(node.style("font-weight").unwrap_or("")),
        italic: node
            .style("font-style")
            .map(|v| v.contains("italic") || v.contains("oblique"))
            .unwrap_or(false),
        alignment: Alignment::from_css(
            node.style("text-align").unwrap_or(""),
            node.style("direction").unwrap_or("ltr"),
        ),
    }
}

// --- Fill ---

fn resolve_fill(node: &RenderedNode) -> FillDescriptor {
    // A gradient painted through the glyphs is a text effect, not a box
    // fill, and is picked up by resolve_text_gradient instead.
    if !clips_background_to_text(node) {
        if let Some(image) = node.style("background-image") {
            if image.contains("gradient") {
                if let Some(gradient) = parse_css_gradient(image) {
                    return FillDescriptor::Gradient(gradient);
                }
            }
        }
    }
    node.style("background-color")
        .map(css_value_to_fill)
        .unwrap_or(FillDescriptor::None)
}

fn clips_background_to_text(node: &RenderedNode) -> bool {
    let clip = node
        .style("-webkit-background-clip")
        .or_else(|| node.style("background-clip"));
    clip == Some("text")
}

fn resolve_text_gradient(node: &RenderedNode) -> Option<crate::models::color::GradientDescriptor> {
    if !clips_background_to_text(node) {
        return None;
    }
    parse_css_gradient(node.style("background-image")?)
}

// --- Borders ---

fn resolve_side(node: &RenderedNode, side: &str) -> Option<BorderDescriptor> {
    let style = node.style(&format!("border-{side}-style")).unwrap_or("none");
    if style == "none" || style == "hidden" {
        return None;
    }
    let width_px = parse_px(node.style(&format!("border-{side}-width")).unwrap_or("0"));
    if width_px <= 0.0 {
        return None;
    }
    let color = node
        .style(&format!("border-{side}-color"))
        .and_then(parse_css_color)?;
    if !color.is_visible() {
        return None;
    }
    Some(BorderDescriptor { color, width_px, line_style: BorderLineStyle::from_css(style) })
}

fn resolve_borders(node: &RenderedNode) -> SideBorders {
    SideBorders {
        top: resolve_side(node, "top"),
        right: resolve_side(node, "right"),
        bottom: resolve_side(node, "bottom"),
        left: resolve_side(node, "left"),
    }
}

// --- Radius ---

/// Parses one corner radius value, resolving percentages against the box's
/// smaller dimension (the axis that decides whether the corner closes into
/// a circle).
fn parse_radius(value: &str, bounds_min: f64) -> f64 {
    let trimmed = value.trim();
    if let Some(pct) = trimmed.strip_suffix('%') {
        return pct.trim().parse::<f64>().unwrap_or(0.0) / 100.0 * bounds_min;
    }
    parse_px(trimmed)
}

fn resolve_radius(node: &RenderedNode) -> CornerRadius {
    let min = node.bounds.min_dimension();
    let corner = |prop: &str| node.style(prop).map(|v| parse_radius(v, min)).unwrap_or(0.0);
    CornerRadius {
        top_left: corner("border-top-left-radius"),
        top_right: corner("border-top-right-radius"),
        bottom_right: corner("border-bottom-right-radius"),
        bottom_left: corner("border-bottom-left-radius"),
    }
}

// --- Shadow ---

/// Parses a computed `box-shadow` value. Computed style puts the color
/// first (`rgba(0, 0, 0, 0.25) 0px 4px 6px 0px`); only the first shadow of
/// a list is kept.
fn resolve_shadow(node: &RenderedNode) -> Option<Shadow> {
    let value = node.style("box-shadow")?;
    if value == "none" {
        return None;
    }
    let first = split_shadow_list(value).into_iter().next()?;

    let mut color = None;
    let mut lengths = Vec::new();
    for token in split_outside_parens(&first) {
        if token.ends_with("px") {
            lengths.push(parse_px(&token));
        } else if token != "inset" {
            if let Some(c) = parse_css_color(&token) {
                color = Some(c);
            }
        }
    }
    let color = color?;
    if !color.is_visible() || lengths.len() < 2 {
        return None;
    }
    Some(Shadow {
        offset_x_px: lengths[0],
        offset_y_px: lengths[1],
        blur_px: lengths.get(2).copied().unwrap_or(0.0),
        color,
    })
}

fn split_shadow_list(value: &str) -> Vec<String> {
    split_at_top_level(value, ',')
}

fn split_outside_parens(value: &str) -> Vec<String> {
    split_at_top_level(value, ' ')
}

fn split_at_top_level(value: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in value.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                if !current.trim().is_empty() {
                    parts.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn resolve_weight(value: &str) -> u16 {
    match value.trim() {
        "bold" => 700,
        "bolder" => 700,
        "normal" | "" => 400,
        "lighter" => 300,
        other => other.parse().unwrap_or(400),
    }
}
