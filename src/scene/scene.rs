//! Scene: the root of a node tree plus its camera.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use glam::Vec2;

use crate::geometry::Rect;
use crate::render::Canvas;

use super::camera::Camera;
use super::node::{FrameReport, Node, NodeHandle};

/// Entry point for a frame: owns the root node and the camera.
///
/// Direct children of the scene are positioned through the camera (with their
/// own parallax divisor); deeper descendants are offset from their parent. The
/// root culls drawing to its view rectangle, normally the window.
pub struct Scene {
    root: NodeHandle,
    camera: Rc<RefCell<Camera>>,
}

impl Scene {
    /// Create a scene whose view rectangle covers `width` x `height` pixels
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_view(Rect::new(0.0, 0.0, width, height))
    }

    pub fn with_view(view: Rect) -> Self {
        let camera = Rc::new(RefCell::new(Camera::default()));
        let mut root = Node::new().named("scene").with_view_rect(view);
        root.make_scene_root(&camera);

        Self {
            root: root.into_handle(),
            camera,
        }
    }

    /// Add a node directly under the scene
    pub fn add_child(&self, child: NodeHandle) {
        self.root.borrow_mut().add_child(child);
    }

    pub fn remove_child(&self, child: &NodeHandle) -> bool {
        self.root.borrow_mut().remove_child(child)
    }

    pub fn root(&self) -> &NodeHandle {
        &self.root
    }

    pub fn child_count(&self) -> usize {
        self.root.borrow().child_count()
    }

    pub fn camera(&self) -> Ref<'_, Camera> {
        self.camera.borrow()
    }

    pub fn camera_mut(&self) -> RefMut<'_, Camera> {
        self.camera.borrow_mut()
    }

    /// Shared camera handle, e.g. for tweening camera pans
    pub fn camera_handle(&self) -> &Rc<RefCell<Camera>> {
        &self.camera
    }

    pub fn view_rect(&self) -> Option<Rect> {
        self.root.borrow().view_rect()
    }

    pub fn set_view_rect(&self, view: Rect) {
        self.root.borrow_mut().set_view_rect(Some(view));
    }

    /// Run one update pass: screen positions resolve top-down, and each
    /// behavior runs once its subtree has updated.
    pub fn update(&self, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        let mut root = self.root.borrow_mut();

        if let Err(err) = root.run_frame(Vec2::ZERO, dt, &mut report) {
            log::error!("Scene update failed: {}", err);
            report.errors.push(err);
        }
        report
    }

    /// Draw the whole tree
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.root.borrow().draw(canvas);
    }
}
