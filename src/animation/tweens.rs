//! Single property tweens and the easing curves they use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use keyframe::{ease, functions};

/// Easing function type for tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseType {
    /// Constant speed interpolation
    #[default]
    Linear,
    /// Quadratic ease in (`t * t`)
    QuadIn,
    /// Quadratic ease out (`t * (2 - t)`)
    QuadOut,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    EaseOut,
    /// Slow start and end, fast middle
    EaseInOut,
    /// Cubic ease out (smoother than quadratic)
    CubicOut,
}

impl EaseType {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = (t as f64).clamp(0.0, 1.0);
        let result = match self {
            EaseType::Linear => ease(functions::Linear, 0.0, 1.0, t),
            EaseType::QuadIn => ease(functions::EaseInQuad, 0.0, 1.0, t),
            EaseType::QuadOut => ease(functions::EaseOutQuad, 0.0, 1.0, t),
            EaseType::EaseIn => ease(functions::EaseIn, 0.0, 1.0, t),
            EaseType::EaseOut => ease(functions::EaseOut, 0.0, 1.0, t),
            EaseType::EaseInOut => ease(functions::EaseInOut, 0.0, 1.0, t),
            EaseType::CubicOut => ease(functions::EaseOutCubic, 0.0, 1.0, t),
        };
        result as f32
    }
}

/// Interpolate between `a` and `b`.
///
/// Written as a weighted sum so that `t == 1.0` yields exactly `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// An object whose numeric attributes can be tweened by name.
///
/// Implementors expose a fixed set of property names; anything else returns `None`
/// from `get_property` and `false` from `set_property`.
pub trait TweenTarget {
    fn get_property(&self, name: &str) -> Option<f32>;

    /// Write a property, returning `false` if the name is unknown
    fn set_property(&mut self, name: &str, value: f32) -> bool;
}

/// Completion callback fired each time a tween finishes a run
pub type TweenCallback = Box<dyn FnMut()>;

/// Options shared by `to` and `from`.
#[derive(Default)]
pub struct TweenOptions {
    pub easing: EaseType,
    /// Seconds to wait before interpolation starts
    pub delay: f32,
    /// Swap origin and destination on completion and run again
    pub bounce: bool,
    pub on_complete: Option<TweenCallback>,
}

impl TweenOptions {
    pub fn easing(mut self, easing: EaseType) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// Outcome of advancing a tween by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TweenStep {
    Running,
    /// Finished a run and restarted in the reverse direction
    Bounced,
    Finished,
    /// The target was dropped before the tween finished
    Orphaned,
}

/// A time-bounded interpolation of one target's properties.
pub(crate) struct Tween {
    pub(crate) id: u64,
    target: Weak<RefCell<dyn TweenTarget>>,
    /// (property, origin, destination)
    properties: Vec<(String, f32, f32)>,
    duration: f32,
    delay: f32,
    elapsed: f32,
    easing: EaseType,
    bounce: bool,
    on_complete: Option<TweenCallback>,
    stopped: bool,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("properties", &self.properties)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("elapsed", &self.elapsed)
            .field("bounce", &self.bounce)
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl Tween {
    pub(crate) fn new(
        id: u64,
        target: Weak<RefCell<dyn TweenTarget>>,
        properties: Vec<(String, f32, f32)>,
        duration: f32,
        options: TweenOptions,
    ) -> Self {
        Self {
            id,
            target,
            properties,
            duration,
            delay: options.delay,
            elapsed: 0.0,
            easing: options.easing,
            bounce: options.bounce,
            on_complete: options.on_complete,
            stopped: false,
        }
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_done(&self) -> bool {
        self.stopped || self.duration <= 0.0 || self.elapsed >= self.delay + self.duration
    }

    pub(crate) fn step(&mut self, dt: f32) -> TweenStep {
        let Some(shared) = self.target.upgrade() else {
            return TweenStep::Orphaned;
        };

        self.elapsed += dt;

        let Ok(mut target) = shared.try_borrow_mut() else {
            log::warn!("Tween {} skipped a step: target is busy", self.id);
            return TweenStep::Running;
        };

        if self.is_done() {
            for (name, _, destination) in &self.properties {
                target.set_property(name, *destination);
            }
            drop(target);
            // Target borrow is released so the callback may touch it
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }

            if self.bounce && !self.stopped {
                self.reverse();
                return TweenStep::Bounced;
            }
            return TweenStep::Finished;
        }

        if self.elapsed < self.delay {
            return TweenStep::Running;
        }

        let t = self.easing.apply((self.elapsed - self.delay) / self.duration);
        for (name, origin, destination) in &self.properties {
            target.set_property(name, lerp(*origin, *destination, t));
        }
        TweenStep::Running
    }

    fn reverse(&mut self) {
        for (_, origin, destination) in &mut self.properties {
            std::mem::swap(origin, destination);
        }
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_exact() {
        assert_eq!(lerp(0.3, 10.7, 0.0), 0.3);
        assert_eq!(lerp(0.3, 10.7, 1.0), 10.7);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_quad_easing_matches_closed_form() {
        for t in [0.1f32, 0.25, 0.5, 0.8] {
            assert!((EaseType::QuadIn.apply(t) - t * t).abs() < 1e-4);
            assert!((EaseType::QuadOut.apply(t) - t * (2.0 - t)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ease_out_faster_at_start() {
        assert!(EaseType::EaseOut.apply(0.25) > EaseType::Linear.apply(0.25));
        assert!(EaseType::CubicOut.apply(0.25) > EaseType::QuadOut.apply(0.25));
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(EaseType::Linear.apply(-1.0), 0.0);
        assert_eq!(EaseType::Linear.apply(2.0), 1.0);
    }
}
