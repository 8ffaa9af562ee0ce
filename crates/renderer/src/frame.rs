//! Sprite sheets, frame references, and stamp intersection.
//!
//! A `SpriteSheet` is an opaque handle to loaded artwork: the sim only
//! needs each frame's extent and hotspot (for positioning and collision
//! stamps). Sheets are shared via `Arc`, so teardown is by scope on
//! every exit path.

use std::sync::Arc;

use engine_core::{Extent, Rect};
use glam::IVec2;

/// One frame of a sprite sheet: pixel extent plus hotspot (the point of
/// the frame that lands on the stamp origin).
#[derive(Debug, Clone, Copy)]
pub struct FrameDef {
    pub extent: Extent,
    pub hotspot: IVec2,
}

impl FrameDef {
    /// Frame with its hotspot at the center, the common case for bodies
    /// and ships.
    pub fn centered(extent: Extent) -> Self {
        Self {
            extent,
            hotspot: IVec2::new(extent.width / 2, extent.height / 2),
        }
    }
}

/// A loaded sprite sheet. Frame dimensions are all the sim reads; pixel
/// data stays with the rendering collaborator.
#[derive(Debug)]
pub struct SpriteSheet {
    pub name: &'static str,
    pub frames: Vec<FrameDef>,
}

impl SpriteSheet {
    pub fn new(name: &'static str, frames: Vec<FrameDef>) -> Arc<Self> {
        Arc::new(Self { name, frames })
    }

    /// Sheet of `count` identical centered frames.
    pub fn uniform(name: &'static str, count: usize, extent: Extent) -> Arc<Self> {
        Self::new(name, vec![FrameDef::centered(extent); count])
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Reference to a single frame of a sheet.
#[derive(Debug, Clone)]
pub struct FrameRef {
    sheet: Arc<SpriteSheet>,
    index: usize,
}

impl FrameRef {
    pub fn new(sheet: Arc<SpriteSheet>, index: usize) -> Self {
        debug_assert!(index < sheet.frame_count(), "frame index out of range");
        Self { sheet, index }
    }

    /// Same sheet, different frame.
    pub fn with_index(&self, index: usize) -> Self {
        Self::new(self.sheet.clone(), index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sheet(&self) -> &Arc<SpriteSheet> {
        &self.sheet
    }

    /// Whether two refs point into the same loaded sheet.
    pub fn same_sheet(&self, other: &FrameRef) -> bool {
        Arc::ptr_eq(&self.sheet, &other.sheet)
    }

    pub fn def(&self) -> FrameDef {
        self.sheet.frames[self.index]
    }

    pub fn extent(&self) -> Extent {
        self.def().extent
    }

    /// Screen-space bounds of this frame stamped at `origin`.
    pub fn bounds_at(&self, origin: IVec2) -> Rect {
        let def = self.def();
        Rect::new(origin - def.hotspot, def.extent)
    }
}

impl PartialEq for FrameRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && Arc::ptr_eq(&self.sheet, &other.sheet)
    }
}

impl Eq for FrameRef {}

/// A frame positioned on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub origin: IVec2,
    pub frame: FrameRef,
}

impl Stamp {
    pub fn new(origin: IVec2, frame: FrameRef) -> Self {
        Self { origin, frame }
    }

    pub fn bounds(&self) -> Rect {
        self.frame.bounds_at(self.origin)
    }
}

/// Bounding-stamp intersection test between two positioned sprites.
pub fn stamps_intersect(a: &Stamp, b: &Stamp) -> bool {
    a.bounds().intersects(&b.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_intersect_on_overlap_only() {
        let sheet = SpriteSheet::uniform("test", 1, Extent::new(10, 10));
        let a = Stamp::new(IVec2::new(0, 0), FrameRef::new(sheet.clone(), 0));
        let near = Stamp::new(IVec2::new(9, 0), FrameRef::new(sheet.clone(), 0));
        let far = Stamp::new(IVec2::new(20, 0), FrameRef::new(sheet, 0));
        assert!(stamps_intersect(&a, &near));
        assert!(!stamps_intersect(&a, &far));
    }

    #[test]
    fn bounds_center_on_hotspot() {
        let sheet = SpriteSheet::uniform("test", 1, Extent::new(8, 6));
        let r = FrameRef::new(sheet, 0).bounds_at(IVec2::new(100, 100));
        assert_eq!(r.corner, IVec2::new(96, 97));
    }
}
