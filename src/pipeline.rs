//! The conversion driver: renders each slide, extracts its shapes, and
//! streams the results into a document sink.
//!
//! Rendering and document writing live behind traits so the core stays
//! free of browser and file-format machinery; callers plug in a headless
//! browser and a presentation writer.

use log::{info, warn};

use crate::errors::{PipelineError, Result};
use crate::extract::structure::{assemble_slide, AssembleOptions};
use crate::extract::units::px_to_emu;
use crate::models::geometry::{Emu, Viewport};
use crate::models::node::{RenderedNode, SlideSource};
use crate::models::shape::SlideDescription;

/// Renders slide markup into a laid-out node tree. Implemented over a
/// headless browser in production; tests use canned trees.
pub trait RenderingEngine {
    fn render(&mut self, source: &SlideSource, viewport: Viewport) -> Result<RenderedNode>;
}

/// Receives finished slides in order. Implementations write the actual
/// presentation file.
pub trait DocumentSink {
    /// Called once before any slide, with the slide canvas size.
    fn begin_presentation(&mut self, width: Emu, height: Emu) -> Result<()>;

    /// Called once per successfully converted slide, in input order.
    fn append_slide(&mut self, slide: &SlideDescription) -> Result<()>;
}

/// One slide that could not be converted. The rest of the deck is
/// unaffected.
#[derive(Debug)]
pub struct SlideFailure {
    pub slide_id: String,
    pub error: PipelineError,
}

/// The outcome of a conversion run.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Slides successfully handed to the sink.
    pub slides_written: usize,
    pub failures: Vec<SlideFailure>,
}

impl ConversionReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts a deck of slides. One slide failing to render or write does not
/// abort the run; it is recorded in the report and the remaining slides
/// proceed. Only a sink that cannot even start the presentation is fatal.
pub fn convert_slides<E, S>(
    engine: &mut E,
    sink: &mut S,
    sources: &[SlideSource],
    opts: &AssembleOptions,
) -> Result<ConversionReport>
where
    E: RenderingEngine,
    S: DocumentSink,
{
    let dpi = opts.dpi.unwrap_or(crate::models::geometry::DEFAULT_DPI);
    sink.begin_presentation(
        px_to_emu(opts.viewport.width, dpi),
        px_to_emu(opts.viewport.height, dpi),
    )?;

    let mut report = ConversionReport::default();
    for source in sources {
        match convert_one(engine, sink, source, opts) {
            Ok(()) => report.slides_written += 1,
            Err(error) => {
                warn!("slide {}: {error}", source.id);
                report.failures.push(SlideFailure { slide_id: source.id.clone(), error });
            }
        }
    }
    info!(
        "converted {} of {} slides",
        report.slides_written,
        sources.len()
    );
    Ok(report)
}

fn convert_one<E, S>(
    engine: &mut E,
    sink: &mut S,
    source: &SlideSource,
    opts: &AssembleOptions,
) -> Result<()>
where
    E: RenderingEngine,
    S: DocumentSink,
{
    let root = engine.render(source, opts.viewport)?;
    let slide = assemble_slide(&source.id, &root, opts);
    sink.append_slide(&slide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::color::FillDescriptor;
    use crate::models::geometry::PxRect;
    use indexmap::IndexMap;

    /// Hands out canned node trees keyed by slide id.
    struct CannedEngine {
        trees: IndexMap<String, RenderedNode>,
    }

    impl RenderingEngine for CannedEngine {
        fn render(&mut self, source: &SlideSource, _viewport: Viewport) -> Result<RenderedNode> {
            self.trees.get(&source.id).cloned().ok_or_else(|| PipelineError::Render {
                slide_id: source.id.clone(),
                message: "page crashed".into(),
            })
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        canvas: Option<(Emu, Emu)>,
        slides: Vec<SlideDescription>,
    }

    impl DocumentSink for CollectingSink {
        fn begin_presentation(&mut self, width: Emu, height: Emu) -> Result<()> {
            self.canvas = Some((width, height));
            Ok(())
        }

        fn append_slide(&mut self, slide: &SlideDescription) -> Result<()> {
            self.slides.push(slide.clone());
            Ok(())
        }
    }

    fn body_with_text(text: &str) -> RenderedNode {
        let mut body = RenderedNode {
            tag: "body".into(),
            bounds: PxRect::new(0.0, 0.0, 1920.0, 1080.0),
            ..Default::default()
        };
        let mut p = RenderedNode {
            tag: "p".into(),
            bounds: PxRect::new(100.0, 100.0, 400.0, 40.0),
            ..Default::default()
        };
        p.children.push(RenderedNode {
            tag: "#text".into(),
            text: Some(text.into()),
            ..Default::default()
        });
        body.children.push(p);
        body
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn a_failing_slide_does_not_sink_the_deck() {
        init_logs();
        let mut trees = IndexMap::new();
        trees.insert("one".to_string(), body_with_text("first"));
        trees.insert("three".to_string(), body_with_text("third"));
        let mut engine = CannedEngine { trees };
        let mut sink = CollectingSink::default();

        let sources = vec![
            SlideSource::new("one", "<html/>"),
            SlideSource::new("two", "<html/>"),
            SlideSource::new("three", "<html/>"),
        ];
        let report =
            convert_slides(&mut engine, &mut sink, &sources, &AssembleOptions::default())
                .unwrap();

        assert_eq!(report.slides_written, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slide_id, "two");
        assert!(!report.all_succeeded());

        // Surviving slides arrive in input order.
        let ids: Vec<&str> = sink.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["one", "three"]);
    }

    #[test]
    fn the_canvas_is_sized_from_the_viewport() {
        let mut engine = CannedEngine { trees: IndexMap::new() };
        let mut sink = CollectingSink::default();
        convert_slides(&mut engine, &mut sink, &[], &AssembleOptions::default()).unwrap();

        // 1920x1080 px at 96 DPI is a 20x11.25 inch canvas.
        let (w, h) = sink.canvas.expect("begin_presentation was called");
        assert_eq!(w, Emu(18_288_000));
        assert_eq!(h, Emu(10_287_000));
    }

    #[test]
    fn converted_slides_carry_their_content() {
        let mut trees = IndexMap::new();
        trees.insert("s".to_string(), body_with_text("hello"));
        let mut engine = CannedEngine { trees };
        let mut sink = CollectingSink::default();

        let sources = vec![SlideSource::new("s", "<html/>")];
        let report =
            convert_slides(&mut engine, &mut sink, &sources, &AssembleOptions::default())
                .unwrap();
        assert!(report.all_succeeded());

        let slide = &sink.slides[0];
        assert_eq!(slide.background, FillDescriptor::Solid(crate::models::Rgba::WHITE));
        assert_eq!(slide.shapes.len(), 1);
        assert!(slide.shapes[0].is_text_box());
    }
}
