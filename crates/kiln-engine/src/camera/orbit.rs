use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use crate::math::Position;

use super::CameraConfig;

/// Keeps the polar angle off the poles so `look_at` never degenerates.
const POLE_MARGIN: f32 = 1e-3;

/// Orbit camera stored in polar coordinates around `config.target`.
///
/// `phi` is measured from +Y, `theta` around +Y starting at +Z; the eye is
/// `target + distance * (sin phi sin theta, cos phi, sin phi cos theta)`.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    distance: f32,
    phi: f32,
    theta: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            distance: 1.0,
            phi: PI / 2.0,
            theta: 0.0,
            config,
        };
        camera.set_origin(camera.config.origin);
        camera
    }

    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn target(&self) -> Position {
        self.config.target
    }

    /// Eye position.
    pub fn origin(&self) -> Position {
        let (sp, cp) = self.phi.sin_cos();
        let (st, ct) = self.theta.sin_cos();
        let offset = Vec3::new(sp * st, cp, sp * ct) * self.distance;
        self.config.target + Position::from(offset)
    }

    /// Places the eye at `origin`. An origin on the target itself falls back to
    /// the configured default, since no direction can be derived from it.
    pub fn set_origin(&mut self, origin: Position) {
        let offset = origin - self.config.target;
        let offset = if offset.is_zero() {
            log::debug!("camera origin on target; using default {}", CameraConfig::default().origin);
            CameraConfig::default().origin - self.config.target
        } else {
            offset
        };
        self.set_offset(offset.to_vec3());
    }

    /// Moves the eye by `direction * dt`, with `direction` in view space
    /// (x right, y up, z forward). The eye stays on its orbit sphere except for
    /// the forward component, which changes the distance.
    pub fn move_by(&mut self, direction: Vec3, dt: f32) {
        let (forward, right, up) = self.basis();
        let step = direction * dt;

        let eye = self.origin().to_vec3() - self.config.target.to_vec3();
        let moved = eye + right * step.x + up * step.y;
        let distance = self.distance - step.z;

        if let Some(dir) = moved.try_normalize() {
            self.set_offset(dir * distance);
        } else {
            self.set_offset(-forward * distance);
        }
    }

    /// Scales the distance by `(1 - zoom_step)^lines`; positive lines move closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - self.config.zoom_step).powf(lines);
        self.distance = self.clamp_distance(self.distance * factor);
    }

    /// Unit `(forward, right, up)` vectors of the current view.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let eye = self.origin().to_vec3();
        let forward = (self.config.target.to_vec3() - eye).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.origin().to_vec3(), self.config.target.to_vec3(), Vec3::Y)
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.config.fov_y, aspect, self.config.near, self.config.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn set_offset(&mut self, offset: Vec3) {
        let length = offset.length();
        self.distance = self.clamp_distance(length);
        self.phi = (offset.y / length)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLE_MARGIN, PI - POLE_MARGIN);
        self.theta = offset.x.atan2(offset.z);
    }

    fn clamp_distance(&self, d: f32) -> f32 {
        d.clamp(self.config.min_distance, self.config.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use glam::Vec4;

    use super::*;

    fn assert_position(p: Position, x: f32, y: f32, z: f32) {
        assert_abs_diff_eq!(p.x(), x, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y(), y, epsilon = 1e-5);
        assert_abs_diff_eq!(p.z(), z, epsilon = 1e-5);
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn default_origin_is_one_one_two() {
        let camera = Camera::default();
        assert_position(camera.origin(), 1.0, 1.0, 2.0);
        assert_relative_eq!(camera.distance(), 6f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn zero_origin_falls_back_to_default() {
        let mut camera = Camera::default();
        camera.set_origin(Position::new(0.0, 0.0, 5.0));
        assert_position(camera.origin(), 0.0, 0.0, 5.0);

        camera.set_origin(Position::ORIGIN);
        assert_position(camera.origin(), 1.0, 1.0, 2.0);
    }

    #[test]
    fn origin_round_trips_through_polar_form() {
        let mut camera = Camera::default();
        for &(x, y, z) in &[(3.0, -2.0, 1.0), (-1.0, 0.5, -4.0), (0.0, 2.0, -0.5)] {
            camera.set_origin(Position::new(x, y, z));
            assert_position(camera.origin(), x, y, z);
        }
    }

    // ── motion ────────────────────────────────────────────────────────────

    #[test]
    fn sideways_motion_keeps_distance() {
        let mut camera = Camera::default();
        let before = camera.distance();
        camera.move_by(Vec3::new(0.5, 0.3, 0.0), 1.0);
        assert_relative_eq!(camera.distance(), before, epsilon = 1e-5);
        assert_relative_eq!(camera.origin().length(), before, epsilon = 1e-5);
    }

    #[test]
    fn rightward_motion_moves_eye_right() {
        let mut camera = Camera::default();
        let (_, right, _) = camera.basis();
        let before = camera.origin().to_vec3();
        camera.move_by(Vec3::X, 0.1);
        assert!((camera.origin().to_vec3() - before).dot(right) > 0.0);
    }

    #[test]
    fn forward_motion_and_zoom_change_distance() {
        let mut camera = Camera::default();
        camera.set_origin(Position::new(0.0, 0.0, 4.0));

        camera.move_by(Vec3::Z, 1.0);
        assert_relative_eq!(camera.distance(), 3.0, epsilon = 1e-5);

        camera.zoom(1.0);
        assert_relative_eq!(camera.distance(), 2.7, epsilon = 1e-5);

        camera.zoom(-1000.0);
        assert_eq!(camera.distance(), camera.config().max_distance);
        camera.zoom(1000.0);
        assert_eq!(camera.distance(), camera.config().min_distance);
    }

    #[test]
    fn vertical_motion_stops_at_the_pole() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.move_by(Vec3::Y, 1.0);
        }
        let (forward, right, up) = camera.basis();
        assert!(forward.is_finite() && right.is_finite() && up.is_finite());
        assert!(camera.view_matrix().is_finite());
    }

    // ── matrices ──────────────────────────────────────────────────────────

    #[test]
    fn basis_is_orthonormal() {
        let (f, r, u) = Camera::default().basis();
        assert_relative_eq!(f.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(r.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(f.dot(r), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(f.dot(u), 0.0, epsilon = 1e-5);
        assert!(u.y > 0.0);
    }

    #[test]
    fn view_puts_target_straight_ahead() {
        let camera = Camera::default();
        let target = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(target.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(target.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.z, -camera.distance(), epsilon = 1e-5);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = Camera::default();
        let clip = camera.view_projection(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let camera = Camera::default();
        assert_eq!(camera.projection_matrix(0.0), camera.projection_matrix(1.0));
        assert_eq!(camera.projection_matrix(f32::NAN), camera.projection_matrix(1.0));
    }
}
