//! Scene graph nodes: transform, anchoring and the per-frame traversal.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use glam::Vec2;

use crate::animation::{Animator, TweenTarget};
use crate::error::{SceneError, SceneResult};
use crate::geometry::Rect;
use crate::render::{Canvas, Graphic};

use super::behavior::Behavior;
use super::camera::Camera;

/// Shared handle to a node in the tree
pub type NodeHandle = Rc<RefCell<Node>>;

bitflags! {
    /// Per-node state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Drawn by its parent
        const VISIBLE = 1 << 0;
        /// Updated by its parent
        const ACTIVE = 1 << 1;
        /// Ignores camera, parallax and ancestor offsets
        const FIXED = 1 << 2;
        /// Removed from its parent on the parent's next update pass
        const KILLED = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE | NodeFlags::ACTIVE
    }
}

/// One axis of an anchor point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorAxis {
    /// Offset in pixels
    Absolute(f32),
    /// Offset as a fraction of the node's size on this axis
    Fraction(f32),
}

impl AnchorAxis {
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            AnchorAxis::Absolute(offset) => offset,
            AnchorAxis::Fraction(fraction) => fraction * extent,
        }
    }
}

/// The point inside a node's box that its position refers to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: AnchorAxis,
    pub y: AnchorAxis,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor::absolute(0.0, 0.0);
    pub const CENTER: Anchor = Anchor::fraction(0.5, 0.5);

    pub const fn absolute(x: f32, y: f32) -> Self {
        Self {
            x: AnchorAxis::Absolute(x),
            y: AnchorAxis::Absolute(y),
        }
    }

    pub const fn fraction(x: f32, y: f32) -> Self {
        Self {
            x: AnchorAxis::Fraction(x),
            y: AnchorAxis::Fraction(y),
        }
    }

    /// Anchor offset in pixels for a box of the given size
    pub fn resolve(&self, size: Vec2) -> Vec2 {
        Vec2::new(self.x.resolve(size.x), self.y.resolve(size.y))
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::TOP_LEFT
    }
}

/// How a node is attached, resolved when it is added to a parent
#[derive(Debug, Clone, Default)]
enum ParentLink {
    #[default]
    Detached,
    Node(Weak<RefCell<Node>>),
    /// Direct child of a scene root; screen position goes through the camera
    Scene {
        parent: Weak<RefCell<Node>>,
        camera: Weak<RefCell<Camera>>,
    },
}

impl ParentLink {
    fn parent(&self) -> Option<NodeHandle> {
        match self {
            ParentLink::Detached => None,
            ParentLink::Node(parent) | ParentLink::Scene { parent, .. } => parent.upgrade(),
        }
    }
}

/// Counters and caught failures from one update pass
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Nodes that ran preupdate/update/postupdate
    pub updated: usize,
    /// Killed nodes swept out of their parents
    pub removed: usize,
    /// Failures caught at node boundaries; their siblings still ran
    pub errors: Vec<SceneError>,
}

impl FrameReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A positioned, sized, optionally drawn element of the scene graph.
pub struct Node {
    name: String,
    position: Vec2,
    anchor: Anchor,
    size_override: Option<Vec2>,
    /// Recomputed every preupdate; never authoritative
    screen: Vec2,
    parallax: f32,
    flags: NodeFlags,
    view_rect: Option<Rect>,
    graphic: Option<Rc<Graphic>>,
    animator: Option<Animator>,
    behavior: Option<Box<dyn Behavior>>,
    children: Vec<NodeHandle>,
    parent: ParentLink,
    scene: Weak<RefCell<Camera>>,
    /// Set on scene roots only
    camera: Option<Weak<RefCell<Camera>>>,
    self_ref: Weak<RefCell<Node>>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("screen", &self.screen)
            .field("anchor", &self.anchor)
            .field("size", &self.size())
            .field("parallax", &self.parallax)
            .field("flags", &self.flags)
            .field("view_rect", &self.view_rect)
            .field("animated", &self.animator.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::ZERO,
            anchor: Anchor::default(),
            size_override: None,
            screen: Vec2::ZERO,
            parallax: 1.0,
            flags: NodeFlags::default(),
            view_rect: None,
            graphic: None,
            animator: None,
            behavior: None,
            children: Vec::new(),
            parent: ParentLink::Detached,
            scene: Weak::new(),
            camera: None,
            self_ref: Weak::new(),
        }
    }
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node drawing `graphic`; its size follows the graphic
    pub fn with_graphic(graphic: Rc<Graphic>) -> Self {
        Self {
            graphic: Some(graphic),
            ..Self::default()
        }
    }

    /// A node driven by a sprite-sheet animator
    pub fn animated(animator: Animator) -> Self {
        Self {
            animator: Some(animator),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_parallax(mut self, parallax: f32) -> Self {
        self.parallax = parallax;
        self
    }

    pub fn with_view_rect(mut self, view: Rect) -> Self {
        self.view_rect = Some(view);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.flags.insert(NodeFlags::FIXED);
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Replace the node's behavior
    pub fn set_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    /// Attach an update closure as the node's behavior
    pub fn with_update<F>(self, update: F) -> Self
    where
        F: FnMut(&mut Node, f32) -> SceneResult<()> + 'static,
    {
        self.with_behavior(update)
    }

    /// Move the node into a shared handle so it can join a tree
    pub fn into_handle(self) -> NodeHandle {
        Rc::new_cyclic(|weak| {
            let mut node = self;
            node.self_ref = weak.clone();
            RefCell::new(node)
        })
    }

    pub(crate) fn make_scene_root(&mut self, camera: &Rc<RefCell<Camera>>) {
        self.camera = Some(Rc::downgrade(camera));
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// Append `child`, making this node its parent.
    ///
    /// A child that already has a parent is detached from it first. If that
    /// parent is mid-traversal (a behavior reparenting a sibling), its stale
    /// entry is skipped and pruned by the parent instead. When this node is a
    /// scene root, or already belongs to a scene, the child's whole subtree is
    /// linked to that scene.
    pub fn add_child(&mut self, child: NodeHandle) {
        let child_weak = Rc::downgrade(&child);
        if Weak::ptr_eq(&self.self_ref, &child_weak) {
            log::warn!("Refusing to add node '{}' to itself", self.name);
            return;
        }

        let previous = child.borrow().parent.parent();
        if let Some(previous) = previous {
            if Weak::ptr_eq(&self.self_ref, &Rc::downgrade(&previous)) {
                self.children.retain(|c| !Rc::ptr_eq(c, &child));
            } else if let Ok(mut previous) = previous.try_borrow_mut() {
                previous.children.retain(|c| !Rc::ptr_eq(c, &child));
            } else {
                log::debug!("Previous parent is busy; it will drop its stale entry");
            }
        }

        let scene = match &self.camera {
            Some(camera) => camera.clone(),
            None => self.scene.clone(),
        };
        {
            let mut node = child.borrow_mut();
            node.parent = match &self.camera {
                Some(camera) => ParentLink::Scene {
                    parent: self.self_ref.clone(),
                    camera: camera.clone(),
                },
                None => ParentLink::Node(self.self_ref.clone()),
            };
            node.link_scene(&scene);
            log::debug!("Attached '{}' under '{}'", node.name, self.name);
        }
        self.children.push(child);
    }

    /// Remove `child` from this node, detaching it. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, child: &NodeHandle) -> bool {
        let Some(index) = self.children.iter().position(|c| Rc::ptr_eq(c, child)) else {
            return false;
        };
        let removed = self.children.remove(index);
        let mut removed = removed.borrow_mut();
        if removed.is_listed_under(&self.self_ref) {
            removed.detach();
        }
        true
    }

    fn detach(&mut self) {
        self.parent = ParentLink::Detached;
        self.link_scene(&Weak::new());
    }

    /// Whether this node's parent link points at `parent`
    fn is_listed_under(&self, parent: &Weak<RefCell<Node>>) -> bool {
        match &self.parent {
            ParentLink::Detached => false,
            ParentLink::Node(link) | ParentLink::Scene { parent: link, .. } => {
                Weak::ptr_eq(link, parent)
            }
        }
    }

    fn link_scene(&mut self, scene: &Weak<RefCell<Camera>>) {
        self.scene = scene.clone();
        for child in &self.children {
            child.borrow_mut().link_scene(scene);
        }
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The parent node, if attached and still alive
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent.parent()
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self.parent, ParentLink::Detached)
    }

    /// Camera of the scene this node belongs to
    pub fn scene_camera(&self) -> Option<Rc<RefCell<Camera>>> {
        self.scene.upgrade()
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn screen_position(&self) -> Vec2 {
        self.screen
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    pub fn parallax(&self) -> f32 {
        self.parallax
    }

    pub fn set_parallax(&mut self, parallax: f32) {
        self.parallax = parallax;
    }

    /// Size override if set, else the graphic's size, else zero
    pub fn size(&self) -> Vec2 {
        if let Some(size) = self.size_override {
            return size;
        }
        self.graphic
            .as_ref()
            .map(|g| Vec2::new(g.width as f32, g.height as f32))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size_override = Some(size);
    }

    /// Drop any size override so the size follows the graphic again
    pub fn autosize(&mut self) {
        self.size_override = None;
    }

    pub fn graphic(&self) -> Option<&Rc<Graphic>> {
        self.graphic.as_ref()
    }

    pub fn set_graphic(&mut self, graphic: Option<Rc<Graphic>>) {
        self.graphic = graphic;
    }

    pub fn view_rect(&self) -> Option<Rect> {
        self.view_rect
    }

    pub fn set_view_rect(&mut self, view: Option<Rect>) {
        self.view_rect = view;
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(NodeFlags::VISIBLE, visible);
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(NodeFlags::ACTIVE)
    }

    pub fn set_active(&mut self, active: bool) {
        self.flags.set(NodeFlags::ACTIVE, active);
    }

    pub fn is_fixed(&self) -> bool {
        self.flags.contains(NodeFlags::FIXED)
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.flags.set(NodeFlags::FIXED, fixed);
    }

    /// Mark the node for removal on its parent's next update pass
    pub fn kill(&mut self) {
        self.flags.insert(NodeFlags::KILLED);
    }

    pub fn is_killed(&self) -> bool {
        self.flags.contains(NodeFlags::KILLED)
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Anchor offset in pixels for the current size
    pub fn resolve_anchor(&self) -> Vec2 {
        self.anchor.resolve(self.size())
    }

    /// Bounding box in world space
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position - self.resolve_anchor(), self.size())
    }

    /// Bounding box in screen space, as of the last preupdate
    pub fn screen_rect(&self) -> Rect {
        Rect::from_origin_size(self.screen - self.resolve_anchor(), self.size())
    }

    /// Hit test against the screen-space box (e.g. for mouse-over)
    pub fn contains_screen_point(&self, x: f32, y: f32) -> bool {
        self.screen_rect().contains_point(x, y)
    }

    /// Screen position for this node given its parent's screen position
    pub fn world_to_screen(&self, parent_screen: Vec2) -> Vec2 {
        if self.is_fixed() {
            return self.position;
        }
        match &self.parent {
            ParentLink::Detached => self.position,
            ParentLink::Node(_) => parent_screen + self.position,
            ParentLink::Scene { camera, .. } => match camera.upgrade() {
                Some(camera) => camera.borrow().world_to_screen(self.position, self.parallax),
                None => self.position,
            },
        }
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    pub fn animator(&self) -> Option<&Animator> {
        self.animator.as_ref()
    }

    pub fn animator_mut(&mut self) -> Option<&mut Animator> {
        self.animator.as_mut()
    }

    pub fn set_animation(&mut self, name: &str) -> SceneResult<()> {
        self.animator
            .as_mut()
            .ok_or(SceneError::NotAnimated)?
            .set_animation(name)
    }

    /// Start playback, showing the current frame right away
    pub fn play(&mut self) -> SceneResult<()> {
        let graphic = self.animator.as_mut().ok_or(SceneError::NotAnimated)?.play()?;
        self.graphic = Some(graphic);
        Ok(())
    }

    pub fn pause(&mut self) {
        if let Some(animator) = self.animator.as_mut() {
            animator.pause();
        }
    }

    pub fn stop(&mut self) {
        if let Some(animator) = self.animator.as_mut() {
            animator.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.animator.as_ref().is_some_and(Animator::is_playing)
    }

    // ------------------------------------------------------------------
    // Frame protocol
    // ------------------------------------------------------------------

    /// Resolve this frame's screen position and advance the animation
    pub fn preupdate(&mut self, parent_screen: Vec2, dt: f32) -> SceneResult<()> {
        self.screen = self.world_to_screen(parent_screen);

        if let Some(animator) = self.animator.as_mut() {
            if let Some(graphic) = animator.advance(dt)? {
                self.graphic = Some(graphic);
            }
        }
        Ok(())
    }

    /// Drive every active child, then run this node's behavior.
    ///
    /// Children killed during an earlier pass are swept first, so a node killed
    /// in frame N is still drawn in frame N and is gone before frame N+1's
    /// children are visited. The behavior sees this frame's screen positions
    /// for the whole subtree. A failing child is logged and recorded in
    /// `report`; its siblings still run.
    pub fn update(&mut self, dt: f32, report: &mut FrameReport) -> SceneResult<()> {
        self.sweep(report);

        let screen = self.screen;
        for child in &self.children {
            let Ok(mut child) = child.try_borrow_mut() else {
                log::warn!("Skipping node under '{}': already borrowed", self.name);
                continue;
            };
            if !child.is_active() || !child.is_listed_under(&self.self_ref) {
                continue;
            }
            report.updated += 1;
            if let Err(err) = child.run_frame(screen, dt, report) {
                log::error!("Node '{}' failed to update: {}", child.name, err);
                report.errors.push(err);
            }
        }
        self.prune_moved();

        if let Some(mut behavior) = self.behavior.take() {
            let result = behavior.update(self, dt);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
            result?;
        }
        Ok(())
    }

    pub fn postupdate(&mut self, dt: f32) -> SceneResult<()> {
        if let Some(mut behavior) = self.behavior.take() {
            let result = behavior.postupdate(self, dt);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
            result?;
        }
        Ok(())
    }

    pub(crate) fn run_frame(
        &mut self,
        parent_screen: Vec2,
        dt: f32,
        report: &mut FrameReport,
    ) -> SceneResult<()> {
        self.preupdate(parent_screen, dt)?;
        self.update(dt, report)?;
        self.postupdate(dt)
    }

    /// Drop killed children, detaching them, along with entries for children
    /// that were moved to another parent.
    fn sweep(&mut self, report: &mut FrameReport) {
        let parent = self.self_ref.clone();
        let mut removed = 0;
        self.children.retain(|child| {
            let Ok(mut node) = child.try_borrow_mut() else {
                return true;
            };
            if !node.is_listed_under(&parent) {
                return false;
            }
            if node.is_killed() {
                log::debug!("Removing killed node '{}'", node.name);
                node.detach();
                removed += 1;
                return false;
            }
            true
        });
        report.removed += removed;
    }

    /// Drop entries for children a behavior moved elsewhere during this pass
    fn prune_moved(&mut self) {
        let parent = self.self_ref.clone();
        self.children.retain(|child| {
            child
                .try_borrow()
                .map_or(true, |node| node.is_listed_under(&parent))
        });
    }

    /// Draw this node and its visible children in list order.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.is_visible() {
            return;
        }

        if let Some(graphic) = &self.graphic {
            let origin = self.screen - self.resolve_anchor();
            canvas.blit(graphic, origin.x.floor() as i32, origin.y.floor() as i32);
        }

        for child in &self.children {
            let Ok(child) = child.try_borrow() else {
                continue;
            };
            if !child.is_listed_under(&self.self_ref) {
                continue;
            }
            if let Some(view) = &self.view_rect {
                if !in_view(view, &child.screen_rect()) {
                    continue;
                }
            }
            child.draw(canvas);
        }

        if let Some(behavior) = &self.behavior {
            behavior.draw(self, canvas);
        }
    }
}

/// Sized boxes must overlap the view; zero-size containers are kept when their origin is inside it
fn in_view(view: &Rect, rect: &Rect) -> bool {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        view.contains_point(rect.x, rect.y)
    } else {
        view.intersects(rect)
    }
}

impl TweenTarget for Node {
    fn get_property(&self, name: &str) -> Option<f32> {
        match name {
            "x" => Some(self.position.x),
            "y" => Some(self.position.y),
            "parallax" => Some(self.parallax),
            "width" => Some(self.size().x),
            "height" => Some(self.size().y),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: f32) -> bool {
        match name {
            "x" => self.position.x = value,
            "y" => self.position.y = value,
            "parallax" => self.parallax = value,
            "width" => self.size_override = Some(Vec2::new(value, self.size().y)),
            "height" => self.size_override = Some(Vec2::new(self.size().x, value)),
            _ => return false,
        }
        true
    }
}
