//! The `Canvas` trait: blocking, order-sensitive draw primitives, plus a
//! recording implementation for tests and headless runs.

use engine_core::Rect;

use crate::frame::Stamp;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Visual style of a full-view transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStyle {
    /// Hard cut to the new view.
    Cut,
    /// Crossfade from the previous view.
    Crossfade,
}

/// Drawing primitives the sim issues. Calls are synchronous; batching
/// defers the flush, and a screen transition may only be fired between
/// a batch and its unbatch so the old and new view never tear.
pub trait Canvas {
    fn batch(&mut self);
    fn unbatch(&mut self);
    fn set_foreground(&mut self, color: Color);
    fn draw_stamp(&mut self, stamp: &Stamp);
    fn draw_filled_rect(&mut self, rect: &Rect);
    /// Elliptical outline inscribed in `rect`, `thickness` pixels wide.
    fn draw_oval(&mut self, rect: &Rect, thickness: i32);
    fn clear(&mut self);
    /// Fade/cut into whatever has been drawn since the last batch.
    /// `None` transitions the whole view.
    fn screen_transition(&mut self, style: TransitionStyle, region: Option<Rect>);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Batch,
    Unbatch,
    Foreground(Color),
    Stamp(Stamp),
    FilledRect(Rect),
    Oval(Rect, i32),
    Clear,
    Transition(TransitionStyle),
}

/// Canvas that records every call; the backing store for assertions in
/// tests and for the headless demo's draw-call counters.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    batch_depth: i32,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stamp(_)))
            .count()
    }

    pub fn transition_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Transition(_)))
            .count()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn batch(&mut self) {
        self.batch_depth += 1;
        self.ops.push(DrawOp::Batch);
    }

    fn unbatch(&mut self) {
        self.batch_depth -= 1;
        debug_assert!(self.batch_depth >= 0, "unbatch without batch");
        self.ops.push(DrawOp::Unbatch);
    }

    fn set_foreground(&mut self, color: Color) {
        self.ops.push(DrawOp::Foreground(color));
    }

    fn draw_stamp(&mut self, stamp: &Stamp) {
        self.ops.push(DrawOp::Stamp(stamp.clone()));
    }

    fn draw_filled_rect(&mut self, rect: &Rect) {
        self.ops.push(DrawOp::FilledRect(*rect));
    }

    fn draw_oval(&mut self, rect: &Rect, thickness: i32) {
        self.ops.push(DrawOp::Oval(*rect, thickness));
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn screen_transition(&mut self, style: TransitionStyle, _region: Option<Rect>) {
        debug_assert!(self.batch_depth > 0, "transition outside a batch");
        self.ops.push(DrawOp::Transition(style));
    }
}
