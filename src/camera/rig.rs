use glam::{Mat4, Quat, Vec3};

use crate::camera::controller::FlightCamera;

/// Fixed eye position of the top-down viewpoint.
const TOP_EYE: Vec3 = Vec3::new(-68.0, 12.0, -11.0);
/// Follow-camera offset from the car, expressed at the car's reference
/// heading of -90 degrees.
const FOLLOW_OFFSET: Vec3 = Vec3::new(13.0, 2.0, 1.8);
/// Heading (degrees) at which [`FOLLOW_OFFSET`] is authored.
const REFERENCE_HEADING: f32 = -90.0;

/// Which viewpoint is driving the view matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewpointMode {
    /// The user-controlled free-flight camera.
    #[default]
    Free,
    /// A fixed elevated viewpoint that tracks the car.
    Top,
    /// A chase viewpoint behind the car, rotating with its heading.
    Follow,
}

/// Owns the free-flight camera and derives the top/follow viewpoints.
///
/// One [`FlightCamera`] lives for the whole session; the top and follow
/// viewpoints hold no state of their own — their eye position is
/// recomputed from the tracked car pose on every query.
pub struct CameraRig {
    /// The user-controlled free-flight camera.
    pub flight: FlightCamera,
    mode: ViewpointMode,
}

impl CameraRig {
    /// Create a rig around an existing free-flight camera.
    #[must_use]
    pub fn new(flight: FlightCamera) -> Self {
        Self {
            flight,
            mode: ViewpointMode::Free,
        }
    }

    /// The active viewpoint mode.
    #[must_use]
    pub fn mode(&self) -> ViewpointMode {
        self.mode
    }

    /// Switch the active viewpoint.
    pub fn set_mode(&mut self, mode: ViewpointMode) {
        self.mode = mode;
    }

    /// View matrix and eye position for the active viewpoint.
    ///
    /// `car_position` / `car_heading_deg` are the tracked car pose; they
    /// are only consulted by the top and follow modes.
    #[must_use]
    pub fn view(
        &self,
        car_position: Vec3,
        car_heading_deg: f32,
    ) -> (Mat4, Vec3) {
        match self.mode {
            ViewpointMode::Free => {
                (self.flight.view_matrix(), self.flight.camera.position)
            }
            ViewpointMode::Top => {
                let view = Mat4::look_at_rh(TOP_EYE, car_position, Vec3::Y);
                (view, TOP_EYE)
            }
            ViewpointMode::Follow => {
                let delta =
                    (car_heading_deg - REFERENCE_HEADING).to_radians();
                let offset = Quat::from_rotation_y(delta) * FOLLOW_OFFSET;
                let eye = car_position + offset;
                let view = Mat4::look_at_rh(eye, car_position, Vec3::Y);
                (view, eye)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The car should sit on the view axis: its view-space position has
    /// no lateral component.
    fn assert_looks_at(view: Mat4, target: Vec3) {
        let p = view.transform_point3(target);
        assert!(p.x.abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
        assert!(p.z < 0.0);
    }

    #[test]
    fn top_viewpoint_tracks_the_car() {
        let mut rig = CameraRig::new(FlightCamera::new(Vec3::ZERO));
        rig.set_mode(ViewpointMode::Top);
        let car = Vec3::new(10.0, -1.78, 5.0);
        let (view, eye) = rig.view(car, -90.0);
        assert_eq!(eye, TOP_EYE);
        assert_looks_at(view, car);
    }

    #[test]
    fn follow_viewpoint_rotates_with_heading() {
        let mut rig = CameraRig::new(FlightCamera::new(Vec3::ZERO));
        rig.set_mode(ViewpointMode::Follow);
        let car = Vec3::new(-64.0, -1.78, 11.0);

        // At the reference heading, the offset is used unrotated.
        let (view, eye) = rig.view(car, -90.0);
        assert!((eye - (car + FOLLOW_OFFSET)).length() < 1e-4);
        assert_looks_at(view, car);

        // A quarter turn of the car swings the eye around +Y.
        let (view, eye) = rig.view(car, 0.0);
        let expected =
            car + Quat::from_rotation_y(90.0_f32.to_radians()) * FOLLOW_OFFSET;
        assert!((eye - expected).length() < 1e-3);
        assert_looks_at(view, car);
    }

    #[test]
    fn free_viewpoint_ignores_the_car() {
        let rig = CameraRig::new(FlightCamera::new(Vec3::new(0.0, 2.0, 10.0)));
        let (a, eye_a) = rig.view(Vec3::new(1.0, 0.0, 0.0), -45.0);
        let (b, eye_b) = rig.view(Vec3::new(-9.0, 3.0, 2.0), 120.0);
        assert_eq!(a.to_cols_array(), b.to_cols_array());
        assert_eq!(eye_a, eye_b);
    }
}
