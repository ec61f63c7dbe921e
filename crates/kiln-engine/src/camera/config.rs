use crate::math::Position;

/// Camera placement and control tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Starting eye position; also used when `Camera::set_origin` receives the target itself.
    pub origin: Position,
    /// Point the camera always looks at.
    pub target: Position,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Allowed eye-to-target distance.
    pub min_distance: f32,
    pub max_distance: f32,
    /// Orbit travel per dragged logical pixel, as a fraction of the current distance.
    pub drag_sensitivity: f32,
    /// Fraction of the distance removed per wheel line.
    pub zoom_step: f32,
    /// Orbit speed for held arrow keys, in distances per second.
    pub key_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(1.0, 1.0, 2.0),
            target: Position::ORIGIN,
            fov_y: 45f32.to_radians(),
            near: 0.05,
            far: 100.0,
            min_distance: 0.25,
            max_distance: 50.0,
            drag_sensitivity: 0.01,
            zoom_step: 0.1,
            key_speed: 1.0,
        }
    }
}
