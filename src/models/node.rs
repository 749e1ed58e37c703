use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::geometry::PxRect;

/// Tag name the rendering collaborator uses for DOM text nodes.
pub const TEXT_NODE_TAG: &str = "#text";

/// One slide's input: a caller-supplied unique id and the HTML document to
/// render. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSource {
    pub id: String,
    /// The full HTML document for this slide.
    pub markup: String,
}

impl SlideSource {
    pub fn new(id: impl Into<String>, markup: impl Into<String>) -> Self {
        SlideSource { id: id.into(), markup: markup.into() }
    }
}

/// A read-only snapshot of one rendered DOM node, as reported by the
/// rendering collaborator after layout. Geometry is in pixels relative to
/// the viewport; the style map holds computed (post-cascade) CSS property
/// values keyed by property name, so no cascade resolution happens here.
///
/// Text content appears as child nodes with tag [`TEXT_NODE_TAG`] and the
/// `text` field set, mirroring how browsers expose the DOM.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    /// Lowercase element tag name, or `#text` for a text node.
    pub tag: String,

    /// Border-box bounding rect in viewport pixels.
    #[serde(default)]
    pub bounds: PxRect,

    /// Computed style, property name -> resolved value. Insertion order is
    /// preserved so snapshots round-trip byte-identically.
    #[serde(default)]
    pub style: IndexMap<String, String>,

    /// Element attributes relevant to extraction (`src`, `alt`, `class`,
    /// `colspan`, `rowspan`).
    #[serde(default)]
    pub attrs: IndexMap<String, String>,

    /// Text content, present only on text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Intrinsic image width in pixels, present only on loaded images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<f64>,

    /// Intrinsic image height in pixels, present only on loaded images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<f64>,

    #[serde(default)]
    pub children: Vec<RenderedNode>,
}

/// Tags that establish block-level content for classification purposes.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "figure", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

impl RenderedNode {
    /// Looks up a computed style property value.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Looks up an element attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn is_text_node(&self) -> bool {
        self.tag == TEXT_NODE_TAG
    }

    pub fn is_image(&self) -> bool {
        self.tag == "img"
    }

    pub fn is_table(&self) -> bool {
        self.tag == "table"
    }

    pub fn is_line_break(&self) -> bool {
        self.tag == "br"
    }

    pub fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    /// Whether the computed style hides this node entirely.
    pub fn is_hidden(&self) -> bool {
        self.style("display") == Some("none") || self.style("visibility") == Some("hidden")
    }

    /// Whether any descendant (at any depth) is a block-level element.
    pub fn has_block_descendants(&self) -> bool {
        self.children
            .iter()
            .any(|c| c.is_block() || c.has_block_descendants())
    }

    /// Concatenated text of this subtree, without styling information.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Whether the subtree contains any non-whitespace text.
    pub fn has_visible_text(&self) -> bool {
        if let Some(text) = &self.text {
            if !text.trim().is_empty() {
                return true;
            }
        }
        self.children.iter().any(RenderedNode::has_visible_text)
    }

    /// Deserializes a node tree from the rendering collaborator's JSON
    /// snapshot.
    pub fn from_json(snapshot: &str) -> serde_json::Result<RenderedNode> {
        serde_json::from_str(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let json = r##"{
            "tag": "div",
            "bounds": { "x": 10.0, "y": 20.0, "width": 100.0, "height": 50.0 },
            "style": { "background-color": "rgb(255, 0, 0)" },
            "children": [
                { "tag": "#text", "text": "hello" }
            ]
        }"##;
        let node = RenderedNode::from_json(json).unwrap();
        assert_eq!(node.tag, "div");
        assert_eq!(node.style("background-color"), Some("rgb(255, 0, 0)"));
        assert!(node.children[0].is_text_node());
        assert!(node.has_visible_text());
        assert_eq!(node.inner_text(), "hello");
    }

    #[test]
    fn block_descendants_are_found_at_depth() {
        let mut root = RenderedNode { tag: "div".into(), ..Default::default() };
        let mut span = RenderedNode { tag: "span".into(), ..Default::default() };
        span.children.push(RenderedNode { tag: "p".into(), ..Default::default() });
        root.children.push(span);
        assert!(root.has_block_descendants());
        assert!(!root.children[0].children[0].has_block_descendants());
    }
}
