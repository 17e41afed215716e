//! Spot light descriptors and the lighting uniform consumed by the
//! shading stage.

use glam::Vec3;

use crate::options::SkyPreset;

/// Number of spot lights the shader consumes (street lamp + two
/// headlights).
pub const SPOT_LIGHT_COUNT: usize = 3;

/// A spot light: a street lamp or one car headlight.
///
/// `cutoff` / `outer_cutoff` are *cosines* of the cone half-angles, so
/// `cutoff >= outer_cutoff` for a soft penumbra ring. The direction is
/// always stored normalized. The renderer only reads these values; the
/// scene re-poses the headlights every frame from the car transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// Lamp position in world space.
    pub position: Vec3,
    /// Normalized beam direction.
    pub direction: Vec3,
    /// Light color (not premultiplied; see [`SpotLight::to_gpu`]).
    pub color: Vec3,
    /// Scalar intensity multiplier.
    pub intensity: f32,
    /// Cosine of the inner cone half-angle (hard core).
    pub cutoff: f32,
    /// Cosine of the outer cone half-angle (soft falloff edge).
    pub outer_cutoff: f32,
    /// Effective radius of influence in world units.
    pub radius: f32,
}

impl SpotLight {
    /// Create a spot light from cone half-angles in degrees.
    ///
    /// The direction is normalized here; the angles are converted to
    /// the cosine form the shader expects.
    #[must_use]
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        inner_deg: f32,
        outer_deg: f32,
        radius: f32,
    ) -> Self {
        Self {
            position,
            direction: direction.normalize_or_zero(),
            color,
            intensity,
            cutoff: inner_deg.to_radians().cos(),
            outer_cutoff: outer_deg.to_radians().cos(),
            radius,
        }
    }

    /// Re-aim the light, keeping the direction normalized.
    pub fn set_pose(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        self.direction = direction.normalize_or_zero();
    }

    /// Pack for the uniform buffer. Color is premultiplied by intensity
    /// so the shader sees a single radiance value.
    #[must_use]
    pub fn to_gpu(&self) -> GpuSpotLight {
        GpuSpotLight {
            position: self.position.to_array(),
            radius: self.radius,
            direction: self.direction.to_array(),
            cutoff: self.cutoff,
            color: (self.color * self.intensity).to_array(),
            outer_cutoff: self.outer_cutoff,
        }
    }
}

/// One spot light as laid out in the uniform buffer (three vec4 rows).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSpotLight {
    /// Lamp position.
    pub position: [f32; 3],
    /// Radius of influence.
    pub radius: f32,
    /// Normalized beam direction.
    pub direction: [f32; 3],
    /// Cosine of the inner cone half-angle.
    pub cutoff: f32,
    /// Color premultiplied by intensity.
    pub color: [f32; 3],
    /// Cosine of the outer cone half-angle.
    pub outer_cutoff: f32,
}

/// Lighting configuration shared by the whole scene pass.
/// NOTE: Must match the WGSL struct layout exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// The scene's spot lights: street lamp, left and right headlight.
    pub spots: [GpuSpotLight; SPOT_LIGHT_COUNT],
    /// Directional (sun/moon) light direction.
    pub sun_direction: [f32; 3],
    pub(crate) _pad0: f32,
    /// Directional light color.
    pub sun_color: [f32; 3],
    pub(crate) _pad1: f32,
    /// Ambient term.
    pub ambient_color: [f32; 3],
    /// Exponential fog density.
    pub fog_density: f32,
    /// Fog color.
    pub fog_color: [f32; 3],
    /// 1 = per-pixel (Phong) shading, 0 = per-vertex (Gouraud).
    pub shading_mode: u32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            spots: [GpuSpotLight::disabled(); SPOT_LIGHT_COUNT],
            sun_direction: [-0.2, -1.0, -0.3],
            _pad0: 0.0,
            sun_color: [1.2, 1.1, 0.9],
            _pad1: 0.0,
            ambient_color: [0.5, 0.5, 0.5],
            fog_density: 0.02,
            fog_color: [0.6, 0.7, 0.8],
            shading_mode: 1,
        }
    }
}

impl GpuSpotLight {
    /// A spot light that contributes nothing (zero color and radius).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            position: [0.0; 3],
            radius: 0.0,
            direction: [0.0, -1.0, 0.0],
            cutoff: 1.0,
            color: [0.0; 3],
            outer_cutoff: 1.0,
        }
    }
}

impl LightingUniform {
    /// Apply a sky preset (sun, ambient, fog).
    pub fn apply_sky(&mut self, sky: &SkyPreset) {
        self.sun_direction = sky.sun_direction;
        self.sun_color = sky.sun_color;
        self.ambient_color = sky.ambient_color;
        self.fog_density = sky.fog_density;
        self.fog_color = sky.fog_color;
    }

    /// Pack the scene's spot lights into the uniform. Call with
    /// disabled lights (e.g. the lamp by day) already zeroed by the
    /// caller via [`GpuSpotLight::disabled`].
    pub fn set_spots(&mut self, spots: [GpuSpotLight; SPOT_LIGHT_COUNT]) {
        self.spots = spots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_normalizes_direction() {
        let light = SpotLight::new(
            Vec3::ZERO,
            Vec3::new(0.0, -5.0, 0.0),
            Vec3::ONE,
            1.0,
            35.0,
            35.5,
            3.0,
        );
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
        assert!((light.direction - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn inner_cosine_dominates_outer() {
        // inner angle <= outer angle means cos(inner) >= cos(outer).
        let light = SpotLight::new(
            Vec3::ZERO,
            Vec3::NEG_Y,
            Vec3::ONE,
            1.0,
            16.0,
            22.0,
            4.0,
        );
        assert!(light.cutoff >= light.outer_cutoff);
    }

    #[test]
    fn gpu_color_is_premultiplied() {
        let light = SpotLight::new(
            Vec3::ZERO,
            Vec3::NEG_Y,
            Vec3::new(1.0, 0.8, 0.6),
            5.0,
            35.0,
            35.5,
            3.0,
        );
        let gpu = light.to_gpu();
        let color = Vec3::from_array(gpu.color);
        assert!((color - Vec3::new(5.0, 4.0, 3.0)).length() < 1e-5);
        assert_eq!(gpu.radius, 3.0);
    }

    #[test]
    fn uniform_size_is_vec4_aligned() {
        // 3 spot lights x 48 bytes + 4 vec4 rows.
        assert_eq!(size_of::<LightingUniform>(), 144 + 64);
        assert_eq!(size_of::<GpuSpotLight>(), 48);
    }
}
