//! Scene camera with parallax-aware coordinate mapping.

use glam::Vec2;

use crate::animation::TweenTarget;

/// Camera offset applied to the direct children of a scene.
///
/// Moving the camera by `+d` shifts nodes with parallax `p` by `d / p` on screen,
/// so layers with a larger divisor appear further away.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    /// Camera offset in world units
    pub position: Vec2,
}

impl Camera {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the camera by `delta`
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Map a world position to the screen for a layer with the given parallax divisor.
    pub fn world_to_screen(&self, world: Vec2, parallax: f32) -> Vec2 {
        if parallax == 1.0 {
            world + self.position
        } else {
            world + self.position / parallax
        }
    }

    /// Inverse of [`Camera::world_to_screen`].
    pub fn screen_to_world(&self, screen: Vec2, parallax: f32) -> Vec2 {
        if parallax == 1.0 {
            screen - self.position
        } else {
            screen - self.position / parallax
        }
    }
}

impl TweenTarget for Camera {
    fn get_property(&self, name: &str) -> Option<f32> {
        match name {
            "x" => Some(self.position.x),
            "y" => Some(self.position.y),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: f32) -> bool {
        match name {
            "x" => self.position.x = value,
            "y" => self.position.y = value,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_screen_without_parallax() {
        let camera = Camera::new(Vec2::new(-30.0, 12.0));
        assert_eq!(
            camera.world_to_screen(Vec2::new(100.0, 100.0), 1.0),
            Vec2::new(70.0, 112.0)
        );
    }

    #[test]
    fn test_parallax_divides_camera_offset() {
        let camera = Camera::new(Vec2::new(-60.0, 30.0));
        assert_eq!(
            camera.world_to_screen(Vec2::new(10.0, 10.0), 3.0),
            Vec2::new(-10.0, 20.0)
        );
    }

    #[test]
    fn test_screen_to_world_inverts() {
        let camera = Camera::new(Vec2::new(-45.0, 9.0));
        for parallax in [1.0, 1.5, 3.0] {
            let world = Vec2::new(17.0, -4.0);
            let back = camera.screen_to_world(camera.world_to_screen(world, parallax), parallax);
            assert!((back - world).length() < 1e-4);
        }
    }

    #[test]
    fn test_tween_properties() {
        let mut camera = Camera::default();
        assert!(camera.set_property("x", 5.0));
        assert!(!camera.set_property("zoom", 2.0));
        assert_eq!(camera.get_property("x"), Some(5.0));
        assert_eq!(camera.get_property("zoom"), None);
    }
}
