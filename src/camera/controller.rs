use glam::{Mat4, Vec3};

use crate::camera::core::{
    Camera, DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_ZOOM,
};
use crate::options::CameraOptions;

/// Pitch is clamped to this magnitude (degrees) to avoid gimbal flip.
const PITCH_LIMIT: f32 = 89.0;
/// Field-of-view clamp range for zoom, in degrees.
const FOV_MIN: f32 = 1.0;
const FOV_MAX: f32 = DEFAULT_ZOOM;

/// Discrete movement directions relative to the camera's own basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Along the forward vector.
    Forward,
    /// Against the forward vector.
    Backward,
    /// Against the right vector.
    Left,
    /// Along the right vector.
    Right,
    /// Along the up vector.
    Up,
    /// Against the up vector.
    Down,
}

/// Free-flight camera controller.
///
/// Translates discrete movement/look/zoom/roll events into camera state
/// changes. All numeric inputs are unconstrained floats that are clamped
/// internally where needed; no operation can fail.
///
/// The controller expects *raw pointer deltas* in [`look`](Self::look) —
/// delta computation (and suppression of the spurious first-event jump)
/// is the input layer's job, see
/// [`InputProcessor`](crate::input::InputProcessor).
pub struct FlightCamera {
    /// The camera state this controller mutates.
    pub camera: Camera,
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Look sensitivity in degrees per pointer unit.
    pub look_sensitivity: f32,
}

impl FlightCamera {
    /// Create a controller at `position` with default speed and
    /// sensitivity.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            camera: Camera::new(position),
            move_speed: DEFAULT_SPEED,
            look_sensitivity: DEFAULT_SENSITIVITY,
        }
    }

    /// Create a controller at `position` configured from options.
    #[must_use]
    pub fn from_options(position: Vec3, options: &CameraOptions) -> Self {
        let mut camera = Camera::new(position);
        camera.fovy = options.fov.clamp(FOV_MIN, FOV_MAX);
        Self {
            camera,
            move_speed: options.move_speed,
            look_sensitivity: options.look_sensitivity,
        }
    }

    /// Displace the position along the current basis by
    /// `move_speed * dt`. Mutates position only; there is no bounds or
    /// collision checking.
    pub fn move_by(&mut self, direction: MoveDirection, dt: f32) {
        let basis = self.camera.basis();
        let velocity = self.move_speed * dt;
        self.camera.position += match direction {
            MoveDirection::Forward => basis.forward * velocity,
            MoveDirection::Backward => -basis.forward * velocity,
            MoveDirection::Left => -basis.right * velocity,
            MoveDirection::Right => basis.right * velocity,
            MoveDirection::Up => basis.up * velocity,
            MoveDirection::Down => -basis.up * velocity,
        };
    }

    /// Apply raw pointer deltas to yaw and pitch, scaled by the look
    /// sensitivity. With `constrain_pitch` the pitch is clamped to
    /// +-89 degrees so the view cannot flip over the pole.
    pub fn look(&mut self, delta_x: f32, delta_y: f32, constrain_pitch: bool) {
        self.camera.yaw += delta_x * self.look_sensitivity;
        self.camera.pitch += delta_y * self.look_sensitivity;
        if constrain_pitch {
            self.camera.pitch =
                self.camera.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    /// Narrow or widen the field of view. This is a true FOV zoom, not a
    /// dolly: the camera does not move.
    pub fn zoom(&mut self, scroll_delta: f32) {
        self.camera.fovy =
            (self.camera.fovy - scroll_delta).clamp(FOV_MIN, FOV_MAX);
    }

    /// Rotate the up/right pair about the forward axis without changing
    /// the look direction.
    pub fn roll(&mut self, delta_degrees: f32) {
        self.camera.roll += delta_degrees;
    }

    /// The view matrix for the current state. The basis is derived fresh
    /// from the stored angles on every call.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_follows_each_basis_axis() {
        let mut cam = FlightCamera::new(Vec3::ZERO);
        let basis = cam.camera.basis();

        cam.move_by(MoveDirection::Forward, 0.5);
        let expected = basis.forward * cam.move_speed * 0.5;
        assert!((cam.camera.position - expected).length() < 1e-5);

        cam.camera.position = Vec3::ZERO;
        cam.move_by(MoveDirection::Left, 1.0);
        let expected = -basis.right * cam.move_speed;
        assert!((cam.camera.position - expected).length() < 1e-5);

        cam.camera.position = Vec3::ZERO;
        cam.move_by(MoveDirection::Down, 2.0);
        let expected = -basis.up * cam.move_speed * 2.0;
        assert!((cam.camera.position - expected).length() < 1e-5);
    }

    #[test]
    fn look_scales_deltas_by_sensitivity() {
        let mut cam = FlightCamera::new(Vec3::ZERO);
        cam.look(100.0, 40.0, true);
        assert!((cam.camera.yaw - (-90.0 + 100.0 * 0.05)).abs() < 1e-5);
        assert!((cam.camera.pitch - 40.0 * 0.05).abs() < 1e-5);
    }

    #[test]
    fn pitch_clamps_exactly_at_limit() {
        let mut cam = FlightCamera::new(Vec3::ZERO);
        cam.look(0.0, 1e7, true);
        assert_eq!(cam.camera.pitch, 89.0);
        cam.look(0.0, -1e9, true);
        assert_eq!(cam.camera.pitch, -89.0);
        // Unconstrained look may exceed the limit.
        cam.camera.pitch = 0.0;
        cam.look(0.0, 1e5, false);
        assert!(cam.camera.pitch > 89.0);
    }

    #[test]
    fn zoom_clamps_to_fov_range() {
        let mut cam = FlightCamera::new(Vec3::ZERO);
        cam.zoom(1000.0);
        assert_eq!(cam.camera.fovy, 1.0);
        cam.zoom(-1000.0);
        assert_eq!(cam.camera.fovy, 45.0);
        cam.zoom(5.0);
        assert_eq!(cam.camera.fovy, 40.0);
    }

    #[test]
    fn roll_accumulates_without_changing_forward() {
        let mut cam = FlightCamera::new(Vec3::ZERO);
        let before = cam.camera.basis().forward;
        cam.roll(30.0);
        cam.roll(-10.0);
        assert_eq!(cam.camera.roll, 20.0);
        let after = cam.camera.basis().forward;
        assert!((before - after).length() < 1e-5);
    }
}
