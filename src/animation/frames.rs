//! Animation tracks: ordered frame descriptors, authorable in RON.

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// One entry of an animation track.
///
/// In RON a track reads like `[{"default_length": 0.125}, {"frame": 0, "length": 1.0}, 1, 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameDescriptor {
    /// Show frame `n` for the running frame length
    Index(usize),
    /// Show `frame`, optionally for its own `length` in seconds
    Frame {
        frame: usize,
        #[serde(default)]
        length: Option<f32>,
    },
    /// Change the running frame length; never shown and takes no time
    DefaultLength { default_length: f32 },
}

impl FrameDescriptor {
    /// Whether this descriptor puts a graphic on screen
    pub fn is_visible(&self) -> bool {
        !matches!(self, FrameDescriptor::DefaultLength { .. })
    }
}

impl From<usize> for FrameDescriptor {
    fn from(index: usize) -> Self {
        FrameDescriptor::Index(index)
    }
}

/// A named animation's ordered frame descriptors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track {
    descriptors: Vec<FrameDescriptor>,
}

impl Track {
    pub fn new(descriptors: Vec<FrameDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Frames `0..count` in order, each for the running frame length
    pub fn sequential(count: usize) -> Self {
        Self::new((0..count).map(FrameDescriptor::Index).collect())
    }

    /// Parse a track from RON
    pub fn from_ron(source: &str) -> SceneResult<Self> {
        ron::from_str(source).map_err(|e| SceneError::TrackParse(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<FrameDescriptor> {
        self.descriptors.get(index).copied()
    }

    pub fn descriptors(&self) -> &[FrameDescriptor] {
        &self.descriptors
    }

    /// Reject tracks that could never put a frame on screen
    pub fn validate(&self, name: &str) -> SceneResult<()> {
        if self.descriptors.is_empty() {
            return Err(SceneError::EmptyTrack(name.to_string()));
        }
        if !self.descriptors.iter().any(FrameDescriptor::is_visible) {
            return Err(SceneError::NoVisibleFrame(name.to_string()));
        }
        Ok(())
    }
}

impl FromIterator<FrameDescriptor> for Track {
    fn from_iter<I: IntoIterator<Item = FrameDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
