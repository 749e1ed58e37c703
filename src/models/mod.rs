//! The canonical data model: input snapshots from the rendering
//! collaborator, normalized style records, and the shape descriptions
//! handed to the document-assembly collaborator.

pub mod color;
pub mod font;
pub mod geometry;
pub mod node;
pub mod shape;
pub mod style;

pub use color::{FillDescriptor, GradientDescriptor, GradientKind, GradientStop, Rgba};
pub use font::DocumentFont;
pub use geometry::{Emu, PxRect, ShapeFrame, Viewport, DEFAULT_DPI, EMU_PER_INCH};
pub use node::{RenderedNode, SlideSource};
pub use shape::{
    Bullet, BulletGlyph, FitMode, GeometricKind, ImageSource, Paragraph, ShapeContent,
    ShapeRecord, SlideDescription, TableCellRecord, TableRecord, TextRun, TriangleDirection,
};
pub use style::{
    Alignment, BorderDescriptor, BorderLineStyle, CornerRadius, Shadow, SideBorders, StyleRecord,
};
