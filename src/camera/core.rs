use glam::{Mat4, Vec3};

use crate::camera::basis::Basis;

/// Default yaw in degrees (looking down -Z).
pub const DEFAULT_YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// Default roll in degrees.
pub const DEFAULT_ROLL: f32 = 0.0;
/// Default movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 10.0;
/// Default look sensitivity in degrees per pointer unit.
pub const DEFAULT_SENSITIVITY: f32 = 0.05;
/// Default vertical field of view (the "zoom") in degrees.
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Perspective camera defined by a position, Euler orientation angles,
/// and projection parameters.
///
/// The orthonormal view basis is *derived* from the angles on every
/// query (see [`Basis::derive`]); it is never stored and integrated, so
/// it can never drift out of orthonormality.
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Yaw angle in degrees (rotation about world up).
    pub yaw: f32,
    /// Pitch angle in degrees (rotation about local right).
    pub pitch: f32,
    /// Roll angle in degrees (rotation about local forward).
    pub roll: f32,
    /// World up direction used to seed the basis derivation.
    pub world_up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees, clamped to [1, 45] by the
    /// controller's zoom handling.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Create a camera at `position` with the default orientation and
    /// projection parameters.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            roll: DEFAULT_ROLL,
            world_up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: DEFAULT_ZOOM,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Derive the current orthonormal basis from the stored angles.
    #[must_use]
    pub fn basis(&self) -> Basis {
        Basis::derive(self.yaw, self.pitch, self.roll, self.world_up)
    }

    /// Build the view matrix from a freshly derived basis.
    ///
    /// The basis is recomputed here on every call, so the matrix always
    /// reflects the latest angles — never a stale orientation.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let basis = self.basis();
        Mat4::look_at_rh(
            self.position,
            self.position + basis.forward,
            basis.up,
        )
    }

    /// Build the projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding view/projection matrices and camera
/// metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Camera forward direction for lighting.
    pub forward: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            fovy: DEFAULT_ZOOM,
            forward: [0.0, 0.0, -1.0],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from an explicit view matrix and eye
    /// position (used by the top and follow viewpoints, whose view is
    /// not produced by a [`Camera`]).
    pub fn update_from_view(
        &mut self,
        view: Mat4,
        projection: Mat4,
        eye: Vec3,
    ) {
        self.view_proj = (projection * view).to_cols_array_2d();
        self.position = eye.to_array();
        // Reconstruct forward from the view matrix rows: the third row
        // of a right-handed look-at is -forward.
        let fwd = -Vec3::new(
            view.x_axis.z,
            view.y_axis.z,
            view.z_axis.z,
        );
        self.forward = fwd.normalize_or_zero().to_array();
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = (camera.projection() * camera.view_matrix())
            .to_cols_array_2d();
        self.position = camera.position.to_array();
        self.forward = camera.basis().forward.to_array();
        self.fovy = camera.fovy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_matrix_tracks_latest_angles() {
        let mut camera = Camera::new(Vec3::ZERO);
        let before = camera.view_matrix();
        camera.yaw = 0.0;
        let after = camera.view_matrix();
        // The matrix must be rebuilt from the new yaw, not cached.
        assert_ne!(before.to_cols_array(), after.to_cols_array());
    }

    #[test]
    fn default_view_looks_down_negative_z() {
        let camera = Camera::new(Vec3::ZERO);
        let view = camera.view_matrix();
        // A point ahead of the camera (along -Z) lands on the negative
        // view-space Z axis.
        let p = view.transform_point3(Vec3::new(0.0, 0.0, -5.0));
        assert!(p.z < 0.0);
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
    }

    #[test]
    fn uniform_forward_matches_camera_forward() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        let fwd = Vec3::from_array(uniform.forward);
        assert!((fwd - camera.basis().forward).length() < 1e-5);

        let mut from_view = CameraUniform::new();
        from_view.update_from_view(
            camera.view_matrix(),
            camera.projection(),
            camera.position,
        );
        let fwd2 = Vec3::from_array(from_view.forward);
        assert!((fwd2 - camera.basis().forward).length() < 1e-4);
    }
}
