//! Slide assembly: walking a rendered node tree and emitting the final
//! shape list.
//!
//! Shapes are emitted in pre-order traversal order, which is the paint
//! order the browser used, so document z-order matches what the slide
//! looked like on screen. Assembly is infallible by design; anything that
//! cannot be extracted degrades (with a log line) instead of failing the
//! slide.

use log::{debug, warn};

use crate::extract::classify::{classify, Classification, ClassifierConfig};
use crate::extract::fonts::FontResolver;
use crate::extract::icons;
use crate::extract::style;
use crate::extract::table;
use crate::extract::text;
use crate::extract::units::{px_to_pt, rect_to_frame};
use crate::models::color::{FillDescriptor, Rgba};
use crate::models::geometry::{ShapeFrame, Viewport};
use crate::models::node::RenderedNode;
use crate::models::shape::{
    FitMode, GeometricKind, ImageSource, Paragraph, ShapeContent, ShapeRecord, SlideDescription,
    TextRun,
};
use crate::models::style::{Alignment, CornerRadius, SideBorders, StyleRecord};

/// Knobs for slide assembly. The defaults reproduce a 1920x1080 render
/// mapped at 96 DPI.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    pub viewport: Viewport,
    pub dpi: Option<f64>,
    pub classifier: ClassifierConfig,
    pub fonts: FontResolver,
    /// Viewport fraction a filled element must cover to be promoted to the
    /// slide background.
    pub background_coverage: Option<f64>,
}

impl AssembleOptions {
    fn dpi(&self) -> f64 {
        self.dpi.unwrap_or(crate::models::geometry::DEFAULT_DPI)
    }

    fn background_coverage(&self) -> f64 {
        self.background_coverage.unwrap_or(0.8)
    }
}

/// Assembles one slide from its rendered root node (normally `body`).
pub fn assemble_slide(
    id: &str,
    root: &RenderedNode,
    opts: &AssembleOptions,
) -> SlideDescription {
    let (background, background_node) = resolve_background(root, opts);

    let mut assembler = Assembler {
        id,
        opts,
        background_node,
        shapes: Vec::new(),
        table_count: 0,
    };
    assembler.visit(root);

    if assembler.shapes.is_empty() {
        warn!("slide {id}: no extractable content, emitting an empty slide");
    }
    SlideDescription { id: id.to_string(), background, shapes: assembler.shapes }
}

/// The slide background is the root's own fill, overridden by any filled
/// element covering most of the viewport (full-bleed hero wrappers). The
/// winning element's fill is consumed so it is not emitted again as a
/// viewport-sized rectangle.
fn resolve_background<'a>(
    root: &'a RenderedNode,
    opts: &AssembleOptions,
) -> (FillDescriptor, Option<&'a RenderedNode>) {
    let mut background = flatten_fill(style::resolve(root).fill);
    let mut consumed = None;
    let mut stack: Vec<&RenderedNode> = root.children.iter().collect();
    while let Some(node) = stack.pop() {
        if node.is_hidden() {
            continue;
        }
        if node.bounds.covers(opts.viewport, opts.background_coverage()) {
            let fill = flatten_fill(style::resolve(node).fill);
            if fill.is_visible() {
                background = fill;
                consumed = Some(node);
            }
            stack.extend(node.children.iter());
        }
        // Elements that do not cover the viewport cannot contain one that
        // does, so the scan stops descending there.
    }
    if background.is_none() {
        background = FillDescriptor::Solid(Rgba::WHITE);
    }
    (background, consumed)
}

struct Assembler<'a> {
    id: &'a str,
    opts: &'a AssembleOptions,
    background_node: Option<&'a RenderedNode>,
    shapes: Vec<ShapeRecord>,
    table_count: usize,
}

impl<'a> Assembler<'a> {
    fn visit(&mut self, node: &'a RenderedNode) {
        for child in &node.children {
            self.visit_node(child);
        }
    }

    fn visit_node(&mut self, node: &'a RenderedNode) {
        if node.is_text_node() || node.is_hidden() {
            return;
        }
        if let Some(glyph) = icons::icon_glyph(node) {
            self.emit_icon(node, glyph);
            return;
        }
        let record = style::resolve(node);

        // The node promoted to slide background paints nothing of its own,
        // but its children still do.
        if self
            .background_node
            .map(|bg| std::ptr::eq(bg, node))
            .unwrap_or(false)
        {
            self.visit(node);
            return;
        }

        match classify(node, &record, &self.opts.classifier) {
            Classification::Drop => {}
            Classification::Container => {
                // A painting container emits its own box first so children
                // stack on top of it in z-order.
                if !record.is_decorative_noop() {
                    if let Some(frame) = self.frame_for(node) {
                        let kind = if record.radius.is_rounded() {
                            GeometricKind::RoundedRectangle
                        } else {
                            GeometricKind::Rectangle
                        };
                        self.emit(frame, &record, ShapeContent::Geometric(kind));
                    }
                }
                self.visit(node);
            }
            Classification::Image => self.emit_image(node, &record),
            Classification::Table => self.emit_table(node, &record),
            Classification::Chip => self.emit_chip(node, &record),
            Classification::TextBox => self.emit_text_box(node, &record),
            Classification::Geometric(kind) => self.emit_geometric(node, &record, kind),
        }
    }

    fn frame_for(&self, node: &RenderedNode) -> Option<ShapeFrame> {
        let frame = rect_to_frame(node.bounds, self.opts.viewport, self.opts.dpi());
        if frame.is_none() {
            debug!(
                "slide {}: <{}> lies outside the viewport, skipping",
                self.id, node.tag
            );
        }
        frame
    }

    fn emit(&mut self, frame: ShapeFrame, record: &StyleRecord, content: ShapeContent) {
        self.shapes.push(ShapeRecord {
            frame,
            fill: flatten_fill(record.fill.clone()),
            borders: record.borders.clone(),
            radius: record.radius,
            content,
        });
    }

    fn emit_text_box(&mut self, node: &'a RenderedNode, record: &StyleRecord) {
        let Some(frame) = self.frame_for(node) else {
            return;
        };
        let paragraphs = text::segment(node, &self.opts.fonts);
        if paragraphs.is_empty() {
            return;
        }
        self.emit(frame, record, ShapeContent::TextBox { paragraphs });
    }

    fn emit_chip(&mut self, node: &'a RenderedNode, record: &StyleRecord) {
        let Some(frame) = self.frame_for(node) else {
            return;
        };
        let mut runs: Vec<TextRun> = text::segment(node, &self.opts.fonts)
            .into_iter()
            .flat_map(|p| p.runs)
            .collect();
        if runs.is_empty() {
            self.emit(
                frame,
                record,
                ShapeContent::Geometric(GeometricKind::RoundedRectangle),
            );
            return;
        }
        // A chip is one label; trailing runs (nested icons etc.) fold into
        // the first run's text.
        let mut run = runs.remove(0);
        for extra in runs {
            run.text.push_str(&extra.text);
        }
        self.emit(frame, record, ShapeContent::Chip { run });
    }

    fn emit_image(&mut self, node: &'a RenderedNode, record: &StyleRecord) {
        let Some(frame) = self.frame_for(node) else {
            return;
        };
        let src = node
            .attr("src")
            .filter(|s| !s.is_empty())
            .or_else(|| crate::extract::classify::background_image_url(node));
        let Some(src) = src else {
            warn!("slide {}: <{}> image without a source, skipping", self.id, node.tag);
            return;
        };
        let natural_aspect = match (node.natural_width, node.natural_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => w / h,
            _ => node.bounds.aspect_ratio(),
        };
        let fit = match node.style("object-fit") {
            Some("contain") => FitMode::Contain,
            _ => FitMode::Fill,
        };
        let circular = record.is_circular(
            node.bounds,
            self.opts.classifier.circle_radius_ratio,
            self.opts.classifier.aspect_min,
            self.opts.classifier.aspect_max,
        );
        self.emit(
            frame,
            record,
            ShapeContent::Image {
                source: ImageSource::from_src(src),
                natural_aspect,
                fit,
                circular,
            },
        );
    }

    fn emit_table(&mut self, node: &'a RenderedNode, record: &StyleRecord) {
        let path = format!("{}/table[{}]", self.id, self.table_count);
        self.table_count += 1;
        match table::reconstruct(node, &path, &self.opts.fonts, self.opts.dpi()) {
            Ok(grid) => {
                if let Some(frame) = self.frame_for(node) {
                    self.emit(frame, record, ShapeContent::Table(grid));
                }
            }
            Err(err) => {
                warn!("{err}; degrading to text");
                self.emit_text_box(node, record);
            }
        }
    }

    fn emit_geometric(&mut self, node: &'a RenderedNode, record: &StyleRecord, kind: GeometricKind) {
        let Some(frame) = self.frame_for(node) else {
            return;
        };
        self.emit(frame, record, ShapeContent::Geometric(kind));
    }

    /// Icon elements become a centered one-run text box carrying the
    /// replacement glyph at the icon's computed color and size.
    fn emit_icon(&mut self, node: &'a RenderedNode, glyph: &str) {
        let Some(frame) = self.frame_for(node) else {
            return;
        };
        let record = style::resolve(node);
        let run = TextRun {
            text: glyph.to_string(),
            font: self.opts.fonts.resolve(&record.font_family),
            size_pt: px_to_pt(record.font_size_px),
            bold: record.is_bold(),
            italic: false,
            color: record.text_color,
            gradient: None,
        };
        self.shapes.push(ShapeRecord {
            frame,
            fill: FillDescriptor::None,
            borders: SideBorders::default(),
            radius: CornerRadius::default(),
            content: ShapeContent::TextBox {
                paragraphs: vec![Paragraph {
                    runs: vec![run],
                    alignment: Alignment::Center,
                    bullet: None,
                }],
            },
        });
    }
}

/// Flattens translucent solid fills over white, since the document format
/// has no translucent solids. Gradient stops keep their alpha; the format
/// does support per-stop transparency.
fn flatten_fill(fill: FillDescriptor) -> FillDescriptor {
    match fill {
        FillDescriptor::Solid(c) if c.is_visible() && !c.is_opaque() => {
            FillDescriptor::Solid(c.blend_over(Rgba::WHITE))
        }
        other => other,
    }
}

/// Convenience wrapper for callers with a raw JSON snapshot.
pub fn assemble_slide_from_json(
    id: &str,
    snapshot: &str,
    opts: &AssembleOptions,
) -> serde_json::Result<SlideDescription> {
    let root = RenderedNode::from_json(snapshot)?;
    Ok(assemble_slide(id, &root, opts))
}
