//! Fly camera: WASD movement, left-drag mouse look, scroll zoom.
//!
//! Yaw and pitch are stored in degrees. Yaw -90° looks down -Z, toward the
//! instance grid from the default position `(0, 0, 3)`.

use glam::{Mat4, Vec3};

/// Direction of a keyboard movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl FlyCamera {
    pub const DEFAULT_SPEED: f32 = 2.5;
    pub const SENSITIVITY: f32 = 0.1;
    pub const MAX_ZOOM: f32 = 45.0;
    pub const MIN_ZOOM: f32 = 1.0;
    pub const MAX_PITCH: f32 = 89.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            zoom: Self::MAX_ZOOM,
            speed: Self::DEFAULT_SPEED,
            sensitivity: Self::SENSITIVITY,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }

    /// Scale movement speed, e.g. for larger scenes.
    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.speed = Self::DEFAULT_SPEED * multiplier;
        self
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the current zoom and `aspect` (width / height).
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect.max(1e-4), Self::NEAR, Self::FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    pub fn process_movement(&mut self, direction: Movement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
        }
    }

    /// Mouse delta in pixels; `dy` is positive when the cursor moves up.
    pub fn process_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        self.update_vectors();
    }

    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = FlyCamera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.zoom, 45.0);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut camera = FlyCamera::default();
        camera.process_movement(Movement::Forward, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
        camera.process_movement(Movement::Right, 0.4);
        assert!((camera.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn speed_multiplier() {
        let camera = FlyCamera::default().with_speed_multiplier(2.0);
        assert_eq!(camera.speed, 5.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_look(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.process_look(0.0, -100_000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_scroll(-10.0);
        assert_eq!(camera.zoom, 45.0);
        camera.process_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = FlyCamera::default();
        let clip = camera.view_projection(16.0 / 9.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
