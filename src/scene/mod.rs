//! Scene graph: nodes, camera and the per-frame update/draw protocol.
//!
//! Each frame the host calls [`Scene::update`] (top-down preupdate, update and
//! postupdate over every active node) and then [`Scene::draw`] (visible nodes in
//! child-list order, culled by view rectangles).

mod behavior;
mod camera;
mod node;
#[allow(clippy::module_inception)]
mod scene;

pub use behavior::Behavior;
pub use camera::Camera;
pub use node::{Anchor, AnchorAxis, FrameReport, Node, NodeFlags, NodeHandle};
pub use scene::Scene;
