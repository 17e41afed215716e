use serde::{Deserialize, Serialize};

use crate::camera::core::{
    DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_ZOOM,
};

/// Free-flight camera tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Look sensitivity in degrees per pointer unit.
    pub look_sensitivity: f32,
    /// Initial vertical field of view in degrees.
    pub fov: f32,
    /// Whether pitch is clamped away from the poles.
    pub constrain_pitch: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_SPEED,
            look_sensitivity: DEFAULT_SENSITIVITY,
            fov: DEFAULT_ZOOM,
            constrain_pitch: true,
        }
    }
}
