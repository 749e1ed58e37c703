//! The extraction pipeline: from a rendered node tree to a slide
//! description.
//!
//! The stages are deliberately small and pure. [`style`] reads one node's
//! computed style map, [`classify`] decides what kind of shape a node maps
//! to, [`text`] and [`table`] extract content, and [`structure`] walks the
//! tree and assembles the final [`SlideDescription`](crate::models::SlideDescription).

pub mod classify;
pub mod error;
pub mod fonts;
pub mod icons;
pub mod structure;
pub mod style;
pub mod table;
pub mod text;
pub mod units;

pub use classify::{Classification, ClassifierConfig};
pub use error::{ExtractError, Result};
pub use fonts::FontResolver;
pub use structure::{assemble_slide, assemble_slide_from_json, AssembleOptions};
