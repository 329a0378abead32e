//! Screen and world space geometry helpers.

mod rect;

pub use rect::Rect;
