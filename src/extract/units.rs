//! Pixel-to-document-unit conversion and CSS color/gradient parsing.
//!
//! Conversions are pure and always computed from the original pixel value,
//! never re-derived from a previously converted length, so repeated
//! conversion cannot accumulate rounding error.

use crate::models::color::{FillDescriptor, GradientDescriptor, GradientKind, GradientStop, Rgba};
use crate::models::geometry::{Emu, PxRect, ShapeFrame, Viewport, EMU_PER_INCH};

/// CSS pixels to presentation points. Matches the conventional 96 px/inch to
/// 72 pt/inch ratio.
pub const PX_TO_PT_FACTOR: f64 = 0.75;

// --- Length Conversion ---

/// Converts a pixel measurement to EMU at the given DPI. Linear in `px`.
pub fn px_to_emu(px: f64, dpi: f64) -> Emu {
    Emu((px / dpi * EMU_PER_INCH as f64).round() as i64)
}

/// Converts a CSS pixel font size to presentation points.
pub fn px_to_pt(px: f64) -> f64 {
    px * PX_TO_PT_FACTOR
}

/// Converts a pixel rect to a document frame, clipping to the viewport.
/// Returns `None` when nothing of the rect lies inside it.
pub fn rect_to_frame(rect: PxRect, viewport: Viewport, dpi: f64) -> Option<ShapeFrame> {
    let clipped = rect.clamp_to(viewport)?;
    Some(ShapeFrame {
        x: px_to_emu(clipped.x, dpi),
        y: px_to_emu(clipped.y, dpi),
        width: px_to_emu(clipped.width, dpi),
        height: px_to_emu(clipped.height, dpi),
    })
}

/// Parses a numeric pixel value such as `12px` or `12.5`, tolerating
/// trailing junk. Returns 0.0 for anything non-numeric.
pub fn parse_px(value: &str) -> f64 {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    trimmed[..end].parse().unwrap_or(0.0)
}

// --- Color Parsing ---

/// Parses a solid CSS color value (named, hex, rgb/rgba, hsl). Returns
/// `None` for unparseable input; `transparent` parses to an invisible color.
pub fn parse_css_color(value: &str) -> Option<Rgba> {
    let color = csscolorparser::parse(value.trim()).ok()?;
    let [r, g, b, _] = color.to_rgba8();
    // Alpha stays in float form; quantizing it to a byte here would skew
    // later blending by up to half a channel step.
    Some(Rgba::rgba(r, g, b, color.a))
}

/// Maps a CSS background value to a fill descriptor. Gradients take priority
/// over solid colors; anything unparseable or transparent degrades to
/// `FillDescriptor::None` so a bad value can never abort slide assembly.
pub fn css_value_to_fill(value: &str) -> FillDescriptor {
    if value.contains("gradient") {
        if let Some(gradient) = parse_css_gradient(value) {
            return FillDescriptor::Gradient(gradient);
        }
    }
    FillDescriptor::from_color(parse_css_color(value))
}

// --- Gradient Parsing ---

/// Converts a CSS gradient angle (0 = up, clockwise) to the document
/// convention (0 = left-to-right, clockwise from the positive x axis).
pub fn css_angle_to_document(css_deg: f64) -> f32 {
    let normalized = css_deg.rem_euclid(360.0);
    if normalized == 0.0 {
        90.0
    } else if normalized == 180.0 {
        270.0
    } else {
        (normalized - 90.0).rem_euclid(360.0) as f32
    }
}

/// Splits a string at top-level occurrences of `sep`, ignoring separators
/// nested inside parentheses (`rgba(...)` arguments, gradient stop lists).
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = input[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

/// Extracts the balanced-parenthesis argument list following `prefix(`.
fn function_args<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let start = value.find(prefix)? + prefix.len();
    let rest = &value[start..];
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Some(&rest[..i]);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Parses one `<color> [<offset>%]` gradient stop argument. A missing
/// offset is filled in later by interpolation.
fn parse_stop(arg: &str) -> Option<(Option<f32>, Rgba)> {
    // The color may itself contain spaces inside parentheses, so split the
    // trailing percentage off by looking at the last top-level token.
    let tokens = split_top_level(arg, ' ');
    match tokens.as_slice() {
        [] => None,
        [color] => parse_css_color(color).map(|c| (None, c)),
        rest => {
            let last = rest[rest.len() - 1];
            if let Some(pct) = last.strip_suffix('%') {
                let offset: f32 = pct.trim().parse().ok()?;
                let color_str = arg.trim_end_matches(last).trim_end();
                let color = parse_css_color(color_str)?;
                Some((Some((offset / 100.0).clamp(0.0, 1.0)), color))
            } else {
                parse_css_color(arg).map(|c| (None, c))
            }
        }
    }
}

/// Assigns offsets to stops that omitted one: first stop 0, last stop 1,
/// intermediate stops spread evenly between their positioned neighbors.
fn normalize_offsets(raw: Vec<(Option<f32>, Rgba)>) -> Vec<GradientStop> {
    let n = raw.len();
    let mut stops: Vec<GradientStop> = raw
        .iter()
        .enumerate()
        .map(|(i, (offset, color))| {
            let fallback = if n <= 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            GradientStop { offset: offset.unwrap_or(fallback), color: *color }
        })
        .collect();
    stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
    stops
}

/// Parses the leading direction argument of a linear gradient, if present.
/// Returns the document-convention angle and whether the argument was
/// consumed.
fn parse_direction(arg: &str) -> Option<f64> {
    let arg = arg.trim();
    if let Some(deg) = arg.strip_suffix("deg") {
        return deg.trim().parse().ok();
    }
    match arg {
        "to right" => Some(90.0),
        "to left" => Some(270.0),
        "to top" => Some(0.0),
        "to bottom" => Some(180.0),
        "to top right" | "to right top" => Some(45.0),
        "to bottom right" | "to right bottom" => Some(135.0),
        "to bottom left" | "to left bottom" => Some(225.0),
        "to top left" | "to left top" => Some(315.0),
        _ => None,
    }
}

fn parse_single_gradient(value: &str) -> Option<GradientDescriptor> {
    let (kind_args, radial) = if let Some(args) = function_args(value, "linear-gradient(") {
        (args, false)
    } else if let Some(args) = function_args(value, "radial-gradient(") {
        (args, true)
    } else {
        return None;
    };

    let mut args = split_top_level(kind_args, ',');
    if args.is_empty() {
        return None;
    }

    let kind = if radial {
        // Shape/position syntax ("circle at 20% 30%") is dropped; the
        // document gradient always radiates from the center.
        if args[0].contains("circle") || args[0].contains("ellipse") || args[0].starts_with("at ")
        {
            args.remove(0);
        }
        GradientKind::Radial
    } else {
        // CSS defaults to "to bottom" (180deg) when no direction is given.
        let mut css_deg = 180.0;
        if let Some(deg) = parse_direction(args[0]) {
            css_deg = deg;
            args.remove(0);
        }
        GradientKind::Linear { angle_deg: css_angle_to_document(css_deg) }
    };

    let raw: Vec<(Option<f32>, Rgba)> = args.iter().filter_map(|a| parse_stop(a)).collect();
    if raw.len() < 2 {
        return None;
    }
    Some(GradientDescriptor { kind, stops: normalize_offsets(raw) })
}

/// Scores a parsed gradient the way the extraction heuristics rank layered
/// backgrounds: radial over linear, darker and more opaque stop lists over
/// light translucent ones.
fn gradient_score(gradient: &GradientDescriptor) -> f64 {
    let mut score = match gradient.kind {
        GradientKind::Radial => 100.0,
        GradientKind::Linear { .. } => 50.0,
    };
    if !gradient.stops.is_empty() {
        let n = gradient.stops.len() as f64;
        let avg_luma: f64 = gradient.stops.iter().map(|s| s.color.luma()).sum::<f64>() / n;
        let avg_alpha: f64 =
            gradient.stops.iter().map(|s| f64::from(s.color.a)).sum::<f64>() / n;
        score += (255.0 - avg_luma) / 2.0;
        score += avg_alpha * 50.0;
    }
    score
}

/// Parses a computed `background-image` value into a normalized gradient.
///
/// The value may list several layered backgrounds; each gradient layer is
/// parsed and the highest-scoring one wins. Returns `None` when no layer
/// yields at least two usable stops.
pub fn parse_css_gradient(value: &str) -> Option<GradientDescriptor> {
    split_top_level(value, ',')
        .into_iter()
        .filter(|layer| layer.contains("gradient"))
        .filter_map(parse_single_gradient)
        .max_by(|a, b| {
            gradient_score(a)
                .partial_cmp(&gradient_score(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .or_else(|| parse_single_gradient(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::DEFAULT_DPI;

    #[test]
    fn px_to_emu_is_linear() {
        for px in [1.0, 7.0, 96.0, 250.0, 1920.0] {
            let one = px_to_emu(px, DEFAULT_DPI);
            let two = px_to_emu(2.0 * px, DEFAULT_DPI);
            assert_eq!(two.0, 2 * one.0, "doubling {px}px must double the length");
        }
        // 96 px at 96 DPI is exactly one inch.
        assert_eq!(px_to_emu(96.0, DEFAULT_DPI), Emu(EMU_PER_INCH));
        assert_eq!(px_to_emu(0.0, DEFAULT_DPI), Emu::ZERO);
    }

    #[test]
    fn parse_px_tolerates_suffixes_and_junk() {
        assert_eq!(parse_px("12px"), 12.0);
        assert_eq!(parse_px("12.5"), 12.5);
        assert_eq!(parse_px("-3px"), -3.0);
        assert_eq!(parse_px("none"), 0.0);
        assert_eq!(parse_px(""), 0.0);
    }

    #[test]
    fn solid_colors_parse_across_syntaxes() {
        assert_eq!(parse_css_color("#ff0000"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(parse_css_color("rgb(0, 128, 255)"), Some(Rgba::rgb(0, 128, 255)));
        assert_eq!(parse_css_color("white"), Some(Rgba::WHITE));
        let half = parse_css_color("rgba(10, 20, 30, 0.5)").unwrap();
        assert_eq!((half.r, half.g, half.b), (10, 20, 30));
        // Alpha must come through unquantized, so blending lands on the
        // channel midpoint instead of one step off.
        assert_eq!(half.a, 0.5);
        assert_eq!(half.blend_over(Rgba::WHITE).r, 133);
        assert_eq!(parse_css_color("not-a-color"), None);
    }

    #[test]
    fn transparent_values_degrade_to_no_fill() {
        assert!(css_value_to_fill("transparent").is_none());
        assert!(css_value_to_fill("rgba(0, 0, 0, 0)").is_none());
        assert!(css_value_to_fill("definitely not css").is_none());
    }

    #[test]
    fn linear_gradient_parses_angle_and_stops() {
        let fill = css_value_to_fill("linear-gradient(90deg, #ff71b8 0%, #6b5cff 100%)");
        let FillDescriptor::Gradient(g) = fill else {
            panic!("expected gradient fill");
        };
        assert_eq!(g.kind, GradientKind::Linear { angle_deg: 0.0 });
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].color, Rgba::rgb(0xff, 0x71, 0xb8));
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn gradient_without_direction_defaults_to_downward() {
        let g = parse_css_gradient("linear-gradient(red, blue)").unwrap();
        assert_eq!(g.kind, GradientKind::Linear { angle_deg: 270.0 });
        assert_eq!(g.stops[0].offset, 0.0);
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn radial_gradient_drops_position_syntax() {
        let g =
            parse_css_gradient("radial-gradient(circle at 20% 30%, rgb(147, 51, 234), transparent)")
                .unwrap();
        assert_eq!(g.kind, GradientKind::Radial);
        assert_eq!(g.stops.len(), 2);
    }

    #[test]
    fn layered_backgrounds_prefer_radial_over_linear() {
        let value = "linear-gradient(90deg, #eeeeee, #ffffff), \
                     radial-gradient(rgb(20, 20, 60), rgb(0, 0, 0))";
        let g = parse_css_gradient(value).unwrap();
        assert_eq!(g.kind, GradientKind::Radial);
    }

    #[test]
    fn css_angles_map_to_document_convention() {
        assert_eq!(css_angle_to_document(0.0), 90.0);
        assert_eq!(css_angle_to_document(90.0), 0.0);
        assert_eq!(css_angle_to_document(135.0), 45.0);
        assert_eq!(css_angle_to_document(180.0), 270.0);
        assert_eq!(css_angle_to_document(360.0), 90.0);
    }

    #[test]
    fn frames_are_clipped_to_the_viewport() {
        let vp = Viewport::default();
        let frame = rect_to_frame(PxRect::new(-10.0, 0.0, 20.0, 20.0), vp, DEFAULT_DPI).unwrap();
        assert_eq!(frame.x, Emu(0));
        assert_eq!(frame.width, px_to_emu(10.0, DEFAULT_DPI));
        assert!(rect_to_frame(PxRect::new(3000.0, 0.0, 10.0, 10.0), vp, DEFAULT_DPI).is_none());
    }
}
