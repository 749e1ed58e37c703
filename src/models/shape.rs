use serde::{Deserialize, Serialize};

use crate::models::color::{FillDescriptor, GradientDescriptor, Rgba};
use crate::models::font::DocumentFont;
use crate::models::geometry::ShapeFrame;
use crate::models::style::{Alignment, CornerRadius, SideBorders};

/// A run of text with uniform styling. Runs within one paragraph share a
/// baseline; mixed inline formatting is expressed as multiple runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    /// Always a member of the closed document font set.
    pub font: DocumentFont,
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba,
    /// Gradient painted through the glyphs, with `color` as the solid
    /// fallback for consumers that cannot render it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientDescriptor>,
}

/// Bullet glyph shapes, from CSS `list-style-type` or a detected custom
/// bullet element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulletGlyph {
    #[default]
    Disc,
    Circle,
    Square,
}

/// A list bullet preceding a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub glyph: BulletGlyph,
    pub color: Rgba,
}

/// One paragraph of a text box: an ordered run list plus block-level
/// attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Bullet>,
}

impl Paragraph {
    /// Concatenated plain text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Direction a reconstructed CSS border triangle points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriangleDirection {
    Up,
    Down,
    Left,
    Right,
}

/// The geometric primitive a non-text, non-image node maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometricKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Triangle(TriangleDirection),
}

/// Where image bytes come from. Fetching is the caller's concern; the core
/// only records the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    /// An absolute http(s) URL.
    Url(String),
    /// A path resolved against the caller-supplied base directory.
    Path(String),
    /// An inline `data:` URI carrying the encoded bytes.
    Data(String),
}

impl ImageSource {
    /// Categorizes a raw `src` attribute value.
    pub fn from_src(src: &str) -> ImageSource {
        if src.starts_with("data:") {
            ImageSource::Data(src.to_string())
        } else if src.starts_with("http://") || src.starts_with("https://") {
            ImageSource::Url(src.to_string())
        } else {
            ImageSource::Path(src.to_string())
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            ImageSource::Url(s) | ImageSource::Path(s) | ImageSource::Data(s) => s,
        }
    }
}

/// How an image fills its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitMode {
    /// Preserve the natural aspect ratio, letterboxing inside the frame.
    Contain,
    /// Stretch to the frame.
    #[default]
    Fill,
}

/// One cell of a reconstructed table grid. Spanned-over positions are not
/// represented; a spanning cell appears once at its top-left location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellRecord {
    /// 0-based grid row of the cell's top-left corner.
    pub row: usize,
    /// 0-based grid column of the cell's top-left corner.
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
    pub frame: ShapeFrame,
    pub fill: FillDescriptor,
    pub borders: SideBorders,
    pub runs: Vec<TextRun>,
    pub alignment: Alignment,
    /// Whether the source cell was a header (`th`).
    pub header: bool,
}

/// A rectangular table grid. Every grid position is covered by exactly one
/// cell (counting spans), which the reconstructor guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<TableCellRecord>,
}

/// Variant payload of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeContent {
    TextBox {
        paragraphs: Vec<Paragraph>,
    },
    Image {
        source: ImageSource,
        /// Natural width over natural height.
        natural_aspect: f64,
        fit: FitMode,
        /// Whether the image sits in a circular mask.
        circular: bool,
    },
    Geometric(GeometricKind),
    Table(TableRecord),
    /// An inline label over a pill-shaped background, kept as one composite
    /// shape.
    Chip { run: TextRun },
}

/// The canonical description of one visual element on a slide, independent
/// of the document file format. Position in the slide's shape list is the
/// z-order: later shapes paint on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub frame: ShapeFrame,
    pub fill: FillDescriptor,
    pub borders: SideBorders,
    pub radius: CornerRadius,
    pub content: ShapeContent,
}

impl ShapeRecord {
    pub fn is_text_box(&self) -> bool {
        matches!(self.content, ShapeContent::TextBox { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, ShapeContent::Image { .. })
    }

    pub fn is_table(&self) -> bool {
        matches!(self.content, ShapeContent::Table(_))
    }
}

/// The finished description of one slide, frozen after assembly and handed
/// to the document-assembly collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDescription {
    pub id: String,
    pub background: FillDescriptor,
    /// Shapes in paint order (pre-order DOM traversal order).
    pub shapes: Vec<ShapeRecord>,
}

impl SlideDescription {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
