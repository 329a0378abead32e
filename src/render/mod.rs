//! Rendering seam: pixel payloads and the canvas they are drawn onto.

mod canvas;
mod graphic;

pub use canvas::{Canvas, DrawCall, RecordingCanvas};
pub use graphic::Graphic;
