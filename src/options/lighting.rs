use serde::{Deserialize, Serialize};

/// Sky state for one time of day: directional light, ambient term, fog,
/// and the clear color behind everything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyPreset {
    /// Directional (sun/moon) light direction.
    pub sun_direction: [f32; 3],
    /// Directional light color.
    pub sun_color: [f32; 3],
    /// Ambient term.
    pub ambient_color: [f32; 3],
    /// Exponential fog density.
    pub fog_density: f32,
    /// Fog color.
    pub fog_color: [f32; 3],
    /// Background clear color.
    pub clear_color: [f32; 3],
}

impl Default for SkyPreset {
    fn default() -> Self {
        Self::day()
    }
}

impl SkyPreset {
    /// Daytime: warm sun, light haze, blue sky.
    #[must_use]
    pub fn day() -> Self {
        Self {
            sun_direction: [-0.2, -1.0, -0.3],
            sun_color: [1.2, 1.1, 0.9],
            ambient_color: [0.5, 0.5, 0.5],
            fog_density: 0.02,
            fog_color: [0.6, 0.7, 0.8],
            clear_color: [0.6, 0.8, 1.0],
        }
    }

    /// Night: cold moonlight, dense fog, near-black sky.
    #[must_use]
    pub fn night() -> Self {
        Self {
            sun_direction: [0.1, -1.0, 0.2],
            sun_color: [0.2, 0.2, 0.5],
            ambient_color: [0.05, 0.05, 0.1],
            fog_density: 0.035,
            fog_color: [0.1, 0.1, 0.2],
            clear_color: [0.02, 0.02, 0.1],
        }
    }
}

/// Lighting parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingOptions {
    /// Sky preset used while it is day.
    pub day: SkyPreset,
    /// Sky preset used while it is night.
    pub night: SkyPreset,
    /// Initial headlight intensity in [0, 1].
    pub headlight_intensity: f32,
    /// Whether the scene starts at night.
    pub start_at_night: bool,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            day: SkyPreset::day(),
            night: SkyPreset::night(),
            headlight_intensity: 0.5,
            start_at_night: false,
        }
    }
}
