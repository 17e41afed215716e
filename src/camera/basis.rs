use glam::{Quat, Vec3};

/// Below this length the forward/world-up cross product is treated as
/// degenerate (camera looking straight up or down).
const SINGULARITY_EPS: f32 = 1e-6;

/// An orthonormal camera basis derived from Euler angles.
///
/// The triple is always re-derived in full from the stored angles, never
/// integrated incrementally, so no orthonormality drift can accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Unit vector the camera looks along.
    pub forward: Vec3,
    /// Unit vector pointing to the camera's right.
    pub right: Vec3,
    /// Unit vector pointing up from the camera.
    pub up: Vec3,
}

impl Basis {
    /// Derive the basis from yaw/pitch/roll in degrees and a world-up
    /// vector.
    ///
    /// The derivation order is load-bearing: forward comes from yaw and
    /// pitch alone, roll then rotates the cross-product-derived right
    /// vector about forward, and up is re-derived from `right x forward`.
    /// Reordering changes what "roll" means.
    ///
    /// When forward is (near-)parallel to `world_up` the cross product
    /// degenerates; the right-vector seed falls back to world X rather
    /// than normalizing a near-zero vector.
    #[must_use]
    pub fn derive(
        yaw_deg: f32,
        pitch_deg: f32,
        roll_deg: f32,
        world_up: Vec3,
    ) -> Self {
        let yaw = yaw_deg.to_radians();
        let pitch = pitch_deg.to_radians();
        let forward = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();

        let seed = forward.cross(world_up);
        let seed = if seed.length() > SINGULARITY_EPS {
            seed.normalize()
        } else {
            Vec3::X
        };

        let roll = Quat::from_axis_angle(forward, roll_deg.to_radians());
        let right = (roll * seed).normalize();
        let up = right.cross(forward).normalize();

        Self { forward, right, up }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(b: &Basis) {
        assert!((b.forward.length() - 1.0).abs() < EPS);
        assert!((b.right.length() - 1.0).abs() < EPS);
        assert!((b.up.length() - 1.0).abs() < EPS);
        assert!(b.forward.dot(b.right).abs() < EPS);
        assert!(b.forward.dot(b.up).abs() < EPS);
        assert!(b.right.dot(b.up).abs() < EPS);
    }

    #[test]
    fn orthonormal_across_angle_sweep() {
        for yaw in [-180.0, -90.0, -45.0, 0.0, 30.0, 90.0, 179.0] {
            for pitch in [-85.0, -30.0, 0.0, 30.0, 85.0] {
                for roll in [-90.0, -10.0, 0.0, 10.0, 180.0] {
                    let b = Basis::derive(yaw, pitch, roll, Vec3::Y);
                    assert_orthonormal(&b);
                }
            }
        }
    }

    #[test]
    fn default_angles_look_down_negative_z() {
        let b = Basis::derive(-90.0, 0.0, 0.0, Vec3::Y);
        assert!((b.forward - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
        assert!((b.right - Vec3::X).length() < EPS);
        assert!((b.up - Vec3::Y).length() < EPS);
    }

    #[test]
    fn roll_rotates_up_about_forward() {
        let level = Basis::derive(-90.0, 0.0, 0.0, Vec3::Y);
        let rolled = Basis::derive(-90.0, 0.0, 90.0, Vec3::Y);
        // Forward is unchanged by roll.
        assert!((level.forward - rolled.forward).length() < EPS);
        // Rotating right=+X by +90 degrees about forward=(0,0,-1) lands
        // it on -Y, and the re-derived up lands on +X.
        assert!((rolled.right - Vec3::NEG_Y).length() < 1e-4);
        assert!((rolled.up - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn straight_up_singularity_stays_finite() {
        // pitch 90 makes forward parallel to world up; the fallback seed
        // must keep every component finite and the triple orthonormal.
        let b = Basis::derive(0.0, 90.0, 0.0, Vec3::Y);
        assert!(b.forward.is_finite());
        assert!(b.right.is_finite());
        assert!(b.up.is_finite());
        assert_orthonormal(&b);
    }
}
