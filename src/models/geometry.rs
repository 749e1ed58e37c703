use serde::{Deserialize, Serialize};

/// English Metric Units per inch, the native length unit of the target
/// document format.
pub const EMU_PER_INCH: i64 = 914_400;

/// The DPI at which pixel measurements are mapped into document lengths.
pub const DEFAULT_DPI: f64 = 96.0;

/// A length in English Metric Units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Emu(pub i64);

impl Emu {
    pub const ZERO: Emu = Emu(0);
}

/// An axis-aligned bounding box in CSS pixels, relative to the viewport
/// origin. This is the geometry the rendering collaborator reports per node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        PxRect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Width over height. Degenerate heights yield an aspect of 1.0 so
    /// callers never divide by zero.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Whether either dimension is below the visibility threshold.
    pub fn is_degenerate(&self, min_px: f64) -> bool {
        self.width < min_px || self.height < min_px
    }

    /// Clips this rect to the viewport. Returns `None` when nothing remains
    /// inside it.
    pub fn clamp_to(&self, viewport: Viewport) -> Option<PxRect> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = self.right().min(viewport.width);
        let y1 = self.bottom().min(viewport.height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PxRect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Whether this rect covers at least `fraction` of the viewport in both
    /// dimensions. Used to spot full-bleed background wrappers.
    pub fn covers(&self, viewport: Viewport, fraction: f64) -> bool {
        self.width >= viewport.width * fraction && self.height >= viewport.height * fraction
    }
}

/// The fixed pixel canvas slides are rendered against. 1920x1080 (16:9)
/// unless the caller overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 1920.0, height: 1080.0 }
    }
}

/// Position and size of a shape in document length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeFrame {
    pub x: Emu,
    pub y: Emu,
    pub width: Emu,
    pub height: Emu,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_drops_fully_clipped_rects() {
        let vp = Viewport::default();
        assert!(PxRect::new(2000.0, 0.0, 50.0, 50.0).clamp_to(vp).is_none());
        assert!(PxRect::new(-100.0, -100.0, 50.0, 50.0).clamp_to(vp).is_none());
    }

    #[test]
    fn clamp_trims_partially_visible_rects() {
        let vp = Viewport::default();
        let clipped = PxRect::new(1900.0, -10.0, 100.0, 50.0).clamp_to(vp).unwrap();
        assert_eq!(clipped, PxRect::new(1900.0, 0.0, 20.0, 40.0));
    }

    #[test]
    fn covers_detects_full_bleed_wrappers() {
        let vp = Viewport::default();
        assert!(PxRect::new(0.0, 0.0, 1920.0, 1080.0).covers(vp, 0.8));
        assert!(PxRect::new(0.0, 0.0, 1600.0, 900.0).covers(vp, 0.8));
        assert!(!PxRect::new(0.0, 0.0, 960.0, 1080.0).covers(vp, 0.8));
    }
}
