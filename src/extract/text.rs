//! Segmentation of a text subtree into paragraphs and styled runs.
//!
//! Block elements and `<br>` split paragraphs; inline elements contribute
//! style changes. Adjacent runs with identical styling are coalesced so the
//! run list is minimal, and whitespace is collapsed the way the browser
//! renders it.

use crate::extract::fonts::FontResolver;
use crate::extract::style;
use crate::extract::units::{parse_css_color, px_to_pt};
use crate::models::color::{GradientDescriptor, Rgba};
use crate::models::node::RenderedNode;
use crate::models::shape::{Bullet, BulletGlyph, Paragraph, TextRun};
use crate::models::style::Alignment;

/// The inline style state carried down the subtree walk. Snapshots usually
/// carry fully computed values on every element, but properties missing
/// from a node's style map inherit from the enclosing element.
#[derive(Debug, Clone, PartialEq)]
struct RunStyle {
    font: crate::models::font::DocumentFont,
    size_pt: f64,
    bold: bool,
    italic: bool,
    color: Rgba,
    gradient: Option<GradientDescriptor>,
}

impl RunStyle {
    fn root(node: &RenderedNode, fonts: &FontResolver) -> RunStyle {
        let record = style::resolve(node);
        RunStyle {
            font: fonts.resolve(&record.font_family),
            size_pt: px_to_pt(record.font_size_px),
            bold: record.is_bold(),
            italic: record.italic,
            color: record.text_color,
            gradient: record.text_gradient,
        }
    }

    /// Derives the style for a child element, falling back to this style
    /// for properties the child's map does not mention.
    fn derive(&self, node: &RenderedNode, fonts: &FontResolver) -> RunStyle {
        let record = style::resolve(node);
        let mut next = self.clone();
        if node.style("font-family").is_some() {
            next.font = fonts.resolve(&record.font_family);
        }
        if node.style("font-size").is_some() {
            next.size_pt = px_to_pt(record.font_size_px);
        }
        if node.style("font-weight").is_some() {
            next.bold = record.is_bold();
        }
        if node.style("font-style").is_some() {
            next.italic = record.italic;
        }
        if let Some(color) = node.style("color").and_then(parse_css_color) {
            if color.is_visible() {
                next.color = color;
            }
        }
        if record.text_gradient.is_some() {
            next.gradient = record.text_gradient;
        }
        // Semantic tags imply emphasis even when the snapshot omits the
        // computed weight.
        match node.tag.as_str() {
            "strong" | "b" => next.bold = true,
            "em" | "i" => next.italic = true,
            _ => {}
        }
        next
    }

    fn make_run(&self, text: String) -> TextRun {
        TextRun {
            text,
            font: self.font,
            size_pt: self.size_pt,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
            gradient: self.gradient.clone(),
        }
    }
}

struct Segmenter<'a> {
    fonts: &'a FontResolver,
    paragraphs: Vec<Paragraph>,
    runs: Vec<TextRun>,
    alignment: Alignment,
    bullet: Option<Bullet>,
}

impl<'a> Segmenter<'a> {
    fn push_text(&mut self, text: &str, style: &RunStyle) {
        let collapsed = collapse_whitespace(text);
        if collapsed.is_empty() {
            return;
        }
        // Whitespace-only fragments glue onto the previous run instead of
        // forming a run of their own.
        if collapsed == " " {
            if let Some(last) = self.runs.last_mut() {
                if !last.text.ends_with(' ') {
                    last.text.push(' ');
                }
            }
            return;
        }
        match self.runs.last_mut() {
            // Same-style neighbors collapse into one run.
            Some(last)
                if last.font == style.font
                    && last.size_pt == style.size_pt
                    && last.bold == style.bold
                    && last.italic == style.italic
                    && last.color == style.color
                    && last.gradient == style.gradient =>
            {
                last.text.push_str(&collapsed);
            }
            _ => self.runs.push(style.make_run(collapsed)),
        }
    }

    fn flush_paragraph(&mut self) {
        if let Some(first) = self.runs.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = self.runs.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        self.runs.retain(|r| !r.text.is_empty());
        if !self.runs.is_empty() {
            self.paragraphs.push(Paragraph {
                runs: std::mem::take(&mut self.runs),
                alignment: self.alignment,
                bullet: self.bullet,
            });
        }
        self.runs.clear();
        self.bullet = None;
    }

    fn walk(&mut self, node: &RenderedNode, style: &RunStyle) {
        for child in &node.children {
            if child.is_hidden() {
                continue;
            }
            if let Some(text) = &child.text {
                self.push_text(text, style);
                continue;
            }
            if child.is_line_break() {
                self.flush_paragraph();
                continue;
            }
            let child_style = style.derive(child, self.fonts);
            if child.is_block() {
                self.flush_paragraph();
                let outer_alignment = self.alignment;
                if child.style("text-align").is_some() {
                    self.alignment = Alignment::from_css(
                        child.style("text-align").unwrap_or(""),
                        child.style("direction").unwrap_or("ltr"),
                    );
                }
                if child.tag == "li" {
                    self.bullet = bullet_for(child, node, &child_style);
                }
                self.walk(child, &child_style);
                self.flush_paragraph();
                self.alignment = outer_alignment;
            } else {
                self.walk(child, &child_style);
            }
        }
    }
}

/// Segments a text-bearing subtree into paragraphs. The node's own style
/// provides the base run style and default alignment.
pub fn segment(node: &RenderedNode, fonts: &FontResolver) -> Vec<Paragraph> {
    let record = style::resolve(node);
    let base = RunStyle::root(node, fonts);
    let mut segmenter = Segmenter {
        fonts,
        paragraphs: Vec::new(),
        runs: Vec::new(),
        alignment: record.alignment,
        bullet: None,
    };
    // A node carrying its own text (rare in practice, but snapshots of
    // shallow markup produce it) contributes a leading run.
    if let Some(text) = &node.text {
        segmenter.push_text(text, &base);
    }
    segmenter.walk(node, &base);
    segmenter.flush_paragraph();
    segmenter.paragraphs
}

/// The bullet for a list item, from its own or its list's
/// `list-style-type`. `none` suppresses the bullet.
fn bullet_for(item: &RenderedNode, list: &RenderedNode, style: &RunStyle) -> Option<Bullet> {
    let kind = item
        .style("list-style-type")
        .or_else(|| list.style("list-style-type"))
        .unwrap_or("disc");
    let glyph = match kind.trim() {
        "none" => return None,
        "circle" => BulletGlyph::Circle,
        "square" => BulletGlyph::Square,
        _ => BulletGlyph::Disc,
    };
    Some(Bullet { glyph, color: style.color })
}

/// Collapses runs of whitespace to single spaces, mirroring HTML's default
/// whitespace handling.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::font::DocumentFont;

    fn text_node(text: &str) -> RenderedNode {
        RenderedNode {
            tag: "#text".into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn element(tag: &str, children: Vec<RenderedNode>) -> RenderedNode {
        RenderedNode { tag: tag.into(), children, ..Default::default() }
    }

    #[test]
    fn inline_emphasis_splits_into_three_runs() {
        let node = element(
            "p",
            vec![
                text_node("Hello "),
                element("strong", vec![text_node("world")]),
                text_node("!"),
            ],
        );
        let paragraphs = segment(&node, &FontResolver::new());
        assert_eq!(paragraphs.len(), 1);
        let runs = &paragraphs[0].runs;
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "Hello ");
        assert!(!runs[0].bold);
        assert_eq!(runs[1].text, "world");
        assert!(runs[1].bold);
        assert_eq!(runs[2].text, "!");
        assert!(!runs[2].bold);
    }

    #[test]
    fn same_style_neighbors_coalesce() {
        let node = element(
            "p",
            vec![
                text_node("one "),
                element("span", vec![text_node("two")]),
                text_node(" three"),
            ],
        );
        let paragraphs = segment(&node, &FontResolver::new());
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].runs.len(), 1);
        assert_eq!(paragraphs[0].runs[0].text, "one two three");
    }

    #[test]
    fn blocks_and_line_breaks_split_paragraphs() {
        let node = element(
            "div",
            vec![
                element("h1", vec![text_node("Title")]),
                element(
                    "p",
                    vec![text_node("first"), element("br", vec![]), text_node("second")],
                ),
            ],
        );
        let paragraphs = segment(&node, &FontResolver::new());
        let texts: Vec<String> = paragraphs.iter().map(Paragraph::plain_text).collect();
        assert_eq!(texts, ["Title", "first", "second"]);
    }

    #[test]
    fn whitespace_between_blocks_produces_no_empty_paragraphs() {
        let node = element(
            "div",
            vec![
                text_node("\n  "),
                element("p", vec![text_node("  padded  text  ")]),
                text_node("\n"),
            ],
        );
        let paragraphs = segment(&node, &FontResolver::new());
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].plain_text(), "padded text");
    }

    #[test]
    fn list_items_carry_bullets() {
        let mut ul = element(
            "ul",
            vec![
                element("li", vec![text_node("first")]),
                element("li", vec![text_node("second")]),
            ],
        );
        ul.style.insert("list-style-type".into(), "square".into());
        let paragraphs = segment(&ul, &FontResolver::new());
        assert_eq!(paragraphs.len(), 2);
        for p in &paragraphs {
            assert_eq!(p.bullet.unwrap().glyph, BulletGlyph::Square);
        }
    }

    #[test]
    fn inline_font_changes_survive_inheritance() {
        let mut span = element("span", vec![text_node("mono")]);
        span.style.insert("font-family".into(), "Fira Code, monospace".into());
        let node = element("p", vec![text_node("plain "), span]);
        let paragraphs = segment(&node, &FontResolver::new());
        let runs = &paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].font, DocumentFont::Calibri);
        assert_eq!(runs[1].font, DocumentFont::CourierNew);
    }
}
