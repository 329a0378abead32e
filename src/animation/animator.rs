//! Sprite-sheet playback state machine.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{SceneError, SceneResult};
use crate::render::Graphic;

use super::frames::{FrameDescriptor, Track};

/// Default time each frame stays on screen (15 fps)
pub const DEFAULT_FRAME_LENGTH: f32 = 1.0 / 15.0;

/// Playback state of an [`Animator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    /// Not advancing; position reset to the start of the track
    #[default]
    Stopped,
    Playing,
    /// Not advancing; position retained
    Paused,
}

/// Frame list, named tracks and per-instance playback position.
///
/// Every animator owns its own frame list and track map; graphics inside the
/// frame list are shared `Rc`s, so many animators can reuse one decoded sheet.
#[derive(Debug, Clone)]
pub struct Animator {
    frames: Vec<Rc<Graphic>>,
    tracks: HashMap<String, Track>,
    name: String,
    index: usize,
    /// Time spent on the current frame
    elapsed: f32,
    /// Time the current frame stays on screen
    next_frame_time: f32,
    default_frame_length: f32,
    /// Running frame length set by a duration marker
    frame_length: Option<f32>,
    playback: Playback,
}

impl Animator {
    pub fn new(frames: Vec<Rc<Graphic>>) -> Self {
        Self::with_frame_length(frames, DEFAULT_FRAME_LENGTH)
    }

    pub fn with_frame_length(frames: Vec<Rc<Graphic>>, default_frame_length: f32) -> Self {
        Self {
            frames,
            tracks: HashMap::new(),
            name: String::new(),
            index: 0,
            elapsed: 0.0,
            next_frame_time: 0.0,
            default_frame_length,
            frame_length: None,
            playback: Playback::Stopped,
        }
    }

    /// Register a track, rejecting one that could never show a frame
    pub fn add_track(&mut self, name: impl Into<String>, track: Track) -> SceneResult<()> {
        let name = name.into();
        track.validate(&name)?;
        log::debug!("Registered animation '{}' ({} descriptors)", name, track.len());
        self.tracks.insert(name, track);
        Ok(())
    }

    pub fn has_track(&self, name: &str) -> bool {
        self.tracks.contains_key(name)
    }

    pub fn frames(&self) -> &[Rc<Graphic>] {
        &self.frames
    }

    /// Select a track and rewind to its start.
    ///
    /// Playback state is untouched and no frame is resolved until the next
    /// `play` or frame advance.
    pub fn set_animation(&mut self, name: &str) -> SceneResult<()> {
        if !self.tracks.contains_key(name) {
            return Err(SceneError::UnknownAnimation(name.to_string()));
        }
        self.reset();
        self.frame_length = None;
        self.name = name.to_string();
        Ok(())
    }

    /// Name of the selected track (empty before the first `set_animation`)
    pub fn animation(&self) -> &str {
        &self.name
    }

    /// Start or resume playback, resolving the current frame immediately
    pub fn play(&mut self) -> SceneResult<Rc<Graphic>> {
        let graphic = self.resolve()?;
        self.playback = Playback::Playing;
        Ok(graphic)
    }

    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.reset();
        self.playback = Playback::Stopped;
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    /// Index of the current descriptor within the track
    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// How long the current frame stays on screen
    pub fn pending_duration(&self) -> f32 {
        self.next_frame_time
    }

    pub fn default_frame_length(&self) -> f32 {
        self.default_frame_length
    }

    pub fn set_default_frame_length(&mut self, length: f32) {
        self.default_frame_length = length;
    }

    /// Advance playback by `dt`.
    ///
    /// Returns the new graphic when the frame changed.
    pub fn advance(&mut self, dt: f32) -> SceneResult<Option<Rc<Graphic>>> {
        if self.playback != Playback::Playing {
            return Ok(None);
        }

        self.elapsed += dt;
        if self.elapsed < self.next_frame_time {
            return Ok(None);
        }

        self.index += 1;
        if self.index >= self.track()?.len() {
            self.index = 0;
        }
        self.resolve().map(Some)
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.next_frame_time = 0.0;
        self.index = 0;
    }

    fn track(&self) -> SceneResult<&Track> {
        self.tracks
            .get(&self.name)
            .ok_or_else(|| SceneError::UnknownAnimation(self.name.clone()))
    }

    /// Resolve the graphic and duration for the current index.
    ///
    /// Duration markers are consumed on the way; the walk is bounded by the
    /// track length so a marker-only track cannot loop forever.
    fn resolve(&mut self) -> SceneResult<Rc<Graphic>> {
        self.elapsed = 0.0;
        let len = self.track()?.len();

        for _ in 0..len {
            if self.index >= len {
                self.index = 0;
            }
            let length = self.frame_length.unwrap_or(self.default_frame_length);
            let descriptor = self
                .track()?
                .get(self.index)
                .ok_or_else(|| SceneError::EmptyTrack(self.name.clone()))?;

            match descriptor {
                FrameDescriptor::DefaultLength { default_length } => {
                    self.frame_length = Some(default_length);
                    self.index += 1;
                }
                FrameDescriptor::Index(frame) => {
                    self.next_frame_time = length;
                    return self.frame(frame);
                }
                FrameDescriptor::Frame {
                    frame,
                    length: own_length,
                } => {
                    self.next_frame_time = own_length.unwrap_or(length);
                    return self.frame(frame);
                }
            }
        }

        Err(SceneError::NoVisibleFrame(self.name.clone()))
    }

    fn frame(&self, index: usize) -> SceneResult<Rc<Graphic>> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(SceneError::FrameOutOfRange {
                index,
                available: self.frames.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(count: u32) -> Vec<Rc<Graphic>> {
        (1..=count).map(|i| Graphic::new(i, i).shared()).collect()
    }

    fn animator_with(track: Track, frame_length: f32) -> Animator {
        let mut animator = Animator::with_frame_length(frames(5), frame_length);
        animator.add_track("test", track).unwrap();
        animator.set_animation("test").unwrap();
        animator
    }

    #[test]
    fn test_trailing_marker_wraps_to_first_frame() {
        let track = Track::new(vec![
            0.into(),
            1.into(),
            FrameDescriptor::DefaultLength {
                default_length: 0.5,
            },
        ]);
        let mut animator = animator_with(track, 0.25);
        animator.play().unwrap();

        animator.advance(0.25).unwrap();
        assert_eq!(animator.frame_index(), 1);
        assert_eq!(animator.pending_duration(), 0.25);

        let shown = animator.advance(0.25).unwrap().unwrap();
        assert_eq!(animator.frame_index(), 0);
        assert!(Rc::ptr_eq(&shown, &animator.frames()[0]));
        assert_eq!(animator.pending_duration(), 0.5);
    }

    #[test]
    fn test_wraps_after_full_cycle() {
        let mut animator = animator_with(Track::sequential(3), 0.25);
        let first = animator.play().unwrap();

        assert!(animator.advance(0.25).unwrap().is_some());
        assert_eq!(animator.frame_index(), 1);
        animator.advance(0.25).unwrap();
        assert_eq!(animator.frame_index(), 2);
        let wrapped = animator.advance(0.25).unwrap().unwrap();

        assert_eq!(animator.frame_index(), 0);
        assert!(Rc::ptr_eq(&wrapped, &first));
        assert!(Rc::ptr_eq(&wrapped, &animator.frames()[0]));
    }

    #[test]
    fn test_holds_frame_until_duration_elapses() {
        let mut animator = animator_with(Track::sequential(3), 0.25);
        animator.play().unwrap();

        assert!(animator.advance(0.1).unwrap().is_none());
        assert!(animator.advance(0.1).unwrap().is_none());
        assert_eq!(animator.frame_index(), 0);
        assert!((animator.elapsed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_duration_marker_is_invisible() {
        let track = Track::new(vec![
            FrameDescriptor::DefaultLength {
                default_length: 0.5,
            },
            0.into(),
            1.into(),
        ]);
        let mut animator = animator_with(track, 0.1);

        let shown = animator.play().unwrap();
        assert!(Rc::ptr_eq(&shown, &animator.frames()[0]));
        assert_eq!(animator.pending_duration(), 0.5);
        assert_eq!(animator.elapsed(), 0.0);

        let next = animator.advance(0.5).unwrap().unwrap();
        assert!(Rc::ptr_eq(&next, &animator.frames()[1]));

        // Wrapping passes the marker again without showing an empty frame
        let again = animator.advance(0.5).unwrap().unwrap();
        assert!(Rc::ptr_eq(&again, &animator.frames()[0]));
    }

    #[test]
    fn test_per_frame_length_override() {
        let track = Track::new(vec![
            FrameDescriptor::Frame {
                frame: 2,
                length: Some(1.0),
            },
            3.into(),
        ]);
        let mut animator = animator_with(track, 0.25);

        animator.play().unwrap();
        assert_eq!(animator.pending_duration(), 1.0);
        assert!(animator.advance(0.5).unwrap().is_none());
        let shown = animator.advance(0.5).unwrap().unwrap();
        assert!(Rc::ptr_eq(&shown, &animator.frames()[3]));
        assert_eq!(animator.pending_duration(), 0.25);
    }

    #[test]
    fn test_pause_retains_and_stop_resets() {
        let mut animator = animator_with(Track::sequential(4), 0.25);
        animator.play().unwrap();
        animator.advance(0.25).unwrap();
        animator.advance(0.25).unwrap();

        animator.pause();
        assert_eq!(animator.playback(), Playback::Paused);
        assert!(animator.advance(1.0).unwrap().is_none());
        assert_eq!(animator.frame_index(), 2);

        let resumed = animator.play().unwrap();
        assert!(Rc::ptr_eq(&resumed, &animator.frames()[2]));

        animator.stop();
        assert_eq!(animator.playback(), Playback::Stopped);
        assert_eq!(animator.frame_index(), 0);
        assert_eq!(animator.elapsed(), 0.0);
    }

    #[test]
    fn test_set_animation_resets_position_but_not_playback() {
        let mut animator = Animator::with_frame_length(frames(3), 0.25);
        animator.add_track("a", Track::sequential(3)).unwrap();
        animator.add_track("b", Track::sequential(2)).unwrap();
        animator.set_animation("a").unwrap();
        animator.play().unwrap();
        animator.advance(0.25).unwrap();

        animator.set_animation("b").unwrap();
        assert_eq!(animator.animation(), "b");
        assert_eq!(animator.frame_index(), 0);
        assert_eq!(animator.pending_duration(), 0.0);
        assert!(animator.is_playing());
    }

    #[test]
    fn test_configuration_errors() {
        let mut animator = Animator::new(frames(1));
        assert_eq!(
            animator.set_animation("missing"),
            Err(SceneError::UnknownAnimation("missing".to_string()))
        );
        assert_eq!(
            animator.add_track(
                "markers",
                Track::new(vec![FrameDescriptor::DefaultLength {
                    default_length: 1.0
                }])
            ),
            Err(SceneError::NoVisibleFrame("markers".to_string()))
        );

        animator.add_track("far", Track::new(vec![7.into()])).unwrap();
        animator.set_animation("far").unwrap();
        assert_eq!(
            animator.play(),
            Err(SceneError::FrameOutOfRange {
                index: 7,
                available: 1
            })
        );
        assert!(!animator.is_playing());
    }
}
