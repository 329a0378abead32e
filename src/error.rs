//! Error types for scene and animation configuration problems.

use thiserror::Error;

/// Errors raised by the scene graph, animation tracks and tweens.
///
/// These all indicate authoring bugs (a misnamed animation, a frame index past the
/// end of the frame list, a tween on an attribute the target does not have) and are
/// reported at the point of use rather than silently defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// `set_animation` was given a name with no registered track
    #[error("Unknown animation: {0}")]
    UnknownAnimation(String),

    /// A track with no descriptors at all
    #[error("Animation track '{0}' is empty")]
    EmptyTrack(String),

    /// A track made only of duration markers
    #[error("Animation track '{0}' has no frame-bearing descriptor")]
    NoVisibleFrame(String),

    /// Playback control on a node that carries no animator
    #[error("Node has no animator")]
    NotAnimated,

    #[error("Frame {index} out of range (animation has {available} frames)")]
    FrameOutOfRange { index: usize, available: usize },

    /// A tween referenced an attribute its target does not expose
    #[error("Target has no tweenable property '{0}'")]
    MissingProperty(String),

    /// The tween target is borrowed elsewhere, e.g. a node starting a tween on itself
    #[error("Tween target is busy")]
    TargetBusy,

    #[error("Failed to parse animation track: {0}")]
    TrackParse(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
