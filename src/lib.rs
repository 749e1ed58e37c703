//! # deckmap
//!
//! The extraction and mapping core of an HTML-to-presentation converter.
//!
//! Slides are authored as standalone HTML documents and rendered by a
//! browser elsewhere; this crate takes the rendered, laid-out node tree
//! (geometry plus computed styles) and maps it onto a flat list of
//! presentation shapes: text boxes, images, tables, chips, and geometric
//! primitives, all positioned in EMU on a fixed slide canvas.
//!
//! The crate is deliberately I/O-free. Rendering and document writing sit
//! behind the [`pipeline::RenderingEngine`] and [`pipeline::DocumentSink`]
//! traits, so the core can be tested against canned snapshots and reused
//! with any browser driver or file writer.
//!
//! ```
//! use deckmap::extract::{assemble_slide_from_json, AssembleOptions};
//!
//! let snapshot = r##"{
//!     "tag": "body",
//!     "bounds": { "x": 0.0, "y": 0.0, "width": 1920.0, "height": 1080.0 },
//!     "children": [{
//!         "tag": "h1",
//!         "bounds": { "x": 120.0, "y": 80.0, "width": 900.0, "height": 72.0 },
//!         "children": [{ "tag": "#text", "text": "Hello" }]
//!     }]
//! }"##;
//!
//! let slide = assemble_slide_from_json("intro", snapshot, &AssembleOptions::default())?;
//! assert_eq!(slide.shapes.len(), 1);
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod errors;
pub mod extract;
pub mod models;
pub mod pipeline;

pub use errors::{PipelineError, Result};
pub use extract::{AssembleOptions, ClassifierConfig, ExtractError, FontResolver};
pub use models::{RenderedNode, ShapeRecord, SlideDescription, SlideSource};
pub use pipeline::{convert_slides, ConversionReport, DocumentSink, RenderingEngine};
