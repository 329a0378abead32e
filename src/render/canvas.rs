//! Drawing seam between the scene graph and a graphics backend

use super::graphic::Graphic;

/// Anything the scene graph can blit graphics onto.
///
/// Backends (a wgpu texture, a software framebuffer, a terminal) implement this;
/// the scene graph only ever asks for a graphic to be drawn at an integer
/// top-left screen position.
pub trait Canvas {
    fn blit(&mut self, graphic: &Graphic, x: i32, y: i32);
}

/// A single recorded blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Canvas that records every blit instead of rasterizing.
///
/// Used by the headless demo and by tests that count draw calls.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Forget recorded calls (call once per frame)
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn blit(&mut self, graphic: &Graphic, x: i32, y: i32) {
        self.calls.push(DrawCall {
            x,
            y,
            width: graphic.width,
            height: graphic.height,
        });
    }
}
