//! # Sprig - 2D Scene Graph Runtime
//!
//! A tree of positioned, anchored nodes drawn through a parallax camera, with
//! sprite-sheet frame animation and a tween engine for easing numeric
//! properties over time. Rasterizing is left to the host through [`render::Canvas`].

pub mod animation;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod scene;

pub use error::{SceneError, SceneResult};
pub use scene::{Node, NodeHandle, Scene};

/// Common imports for internal use
pub mod prelude {
    pub use crate::animation::{
        Animator, EaseType, FrameDescriptor, Track, TweenEngine, TweenOptions, TweenTarget,
    };
    pub use crate::error::{SceneError, SceneResult};
    pub use crate::geometry::Rect;
    pub use crate::render::{Canvas, Graphic, RecordingCanvas};
    pub use crate::scene::{Anchor, AnchorAxis, Behavior, Camera, Node, NodeHandle, Scene};
    pub use glam::Vec2;
}
