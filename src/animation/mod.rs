//! Animation: sprite-sheet playback and property tweening.
//!
//! Provides `Animator` for frame-by-frame playback of named tracks, and
//! `TweenEngine` for easing numeric properties of any `TweenTarget` over time.

mod animator;
mod engine;
mod frames;
mod tweens;

pub use animator::{Animator, Playback, DEFAULT_FRAME_LENGTH};
pub use engine::{TweenEngine, TweenHandle};
pub use frames::{FrameDescriptor, Track};
pub use tweens::{lerp, EaseType, TweenCallback, TweenOptions, TweenTarget};
