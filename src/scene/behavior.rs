//! Per-node custom logic hooks

use crate::error::SceneResult;
use crate::render::Canvas;

use super::node::Node;

/// Game logic attached to a node.
///
/// `update` runs after the node's children have been visited, so screen
/// positions across the subtree are current for this frame; `postupdate` runs
/// last, once the node's own update is done. `draw` runs after the node and its children have
/// been drawn, so overlays land on top.
pub trait Behavior {
    fn update(&mut self, _node: &mut Node, _dt: f32) -> SceneResult<()> {
        Ok(())
    }

    fn postupdate(&mut self, _node: &mut Node, _dt: f32) -> SceneResult<()> {
        Ok(())
    }

    fn draw(&self, _node: &Node, _canvas: &mut dyn Canvas) {}
}

/// Closures work as update-only behaviors
impl<F> Behavior for F
where
    F: FnMut(&mut Node, f32) -> SceneResult<()>,
{
    fn update(&mut self, node: &mut Node, dt: f32) -> SceneResult<()> {
        self(node, dt)
    }
}
