//! Manager driving every active tween once per frame.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{SceneError, SceneResult};

use super::tweens::{Tween, TweenOptions, TweenStep, TweenTarget};

/// Identifies a tween registered with a [`TweenEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(u64);

/// Owns the active tweens and advances them in insertion order.
///
/// The engine never owns tween targets: it holds them weakly, and a tween whose
/// target has been dropped is discarded on the next update. Two tweens writing
/// the same property are not prevented; whichever is updated last in a frame wins.
#[derive(Debug, Default)]
pub struct TweenEngine {
    tweens: Vec<Tween>,
    time: f32,
    next_id: u64,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `target`'s properties from their current values to `properties`.
    ///
    /// Fails with [`SceneError::TargetBusy`] if the target is currently borrowed.
    pub fn to<T>(
        &mut self,
        target: &Rc<RefCell<T>>,
        properties: &[(&str, f32)],
        duration: f32,
        options: TweenOptions,
    ) -> SceneResult<TweenHandle>
    where
        T: TweenTarget + 'static,
    {
        let current = {
            let target = target.try_borrow().map_err(|_| SceneError::TargetBusy)?;
            Self::snapshot(&*target, properties)?
        };
        let plan = current
            .into_iter()
            .zip(properties)
            .map(|((name, origin), (_, destination))| (name, origin, *destination))
            .collect();
        Ok(self.push(target, plan, duration, options))
    }

    /// Tween `target`'s properties from `properties` back to their current values.
    ///
    /// The target is snapped to the given starting values immediately.
    pub fn from<T>(
        &mut self,
        target: &Rc<RefCell<T>>,
        properties: &[(&str, f32)],
        duration: f32,
        options: TweenOptions,
    ) -> SceneResult<TweenHandle>
    where
        T: TweenTarget + 'static,
    {
        let current = {
            let mut target = target
                .try_borrow_mut()
                .map_err(|_| SceneError::TargetBusy)?;
            let current = Self::snapshot(&*target, properties)?;
            for (name, value) in properties {
                target.set_property(name, *value);
            }
            current
        };
        let plan = current
            .into_iter()
            .zip(properties)
            .map(|((name, destination), (_, origin))| (name, *origin, destination))
            .collect();
        Ok(self.push(target, plan, duration, options))
    }

    /// Advance every tween by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;

        self.tweens.retain_mut(|tween| match tween.step(dt) {
            TweenStep::Running => true,
            TweenStep::Bounced => {
                log::debug!("Tween {} bounced", tween.id);
                true
            }
            TweenStep::Finished => {
                log::debug!("Tween {} finished", tween.id);
                false
            }
            TweenStep::Orphaned => {
                log::debug!("Tween {} dropped: target no longer exists", tween.id);
                false
            }
        });
    }

    /// Stop a tween; it completes (destination applied, callback fired) on the next update.
    ///
    /// Returns `false` if the tween already finished.
    pub fn stop(&mut self, handle: TweenHandle) -> bool {
        match self.tweens.iter_mut().find(|t| t.id == handle.0) {
            Some(tween) => {
                tween.stop();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.tweens.iter().any(|t| t.id == handle.0)
    }

    /// Total time fed to `update` so far
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    fn snapshot(
        target: &dyn TweenTarget,
        properties: &[(&str, f32)],
    ) -> SceneResult<Vec<(String, f32)>> {
        properties
            .iter()
            .map(|(name, _)| {
                target
                    .get_property(name)
                    .map(|value| (name.to_string(), value))
                    .ok_or_else(|| SceneError::MissingProperty(name.to_string()))
            })
            .collect()
    }

    fn push<T>(
        &mut self,
        target: &Rc<RefCell<T>>,
        plan: Vec<(String, f32, f32)>,
        duration: f32,
        options: TweenOptions,
    ) -> TweenHandle
    where
        T: TweenTarget + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let shared: Rc<RefCell<dyn TweenTarget>> = target.clone();
        self.tweens
            .push(Tween::new(id, Rc::downgrade(&shared), plan, duration, options));
        log::debug!("Tween {} started ({} properties, {}s)", id, self.tweens.len(), duration);
        TweenHandle(id)
    }
}
