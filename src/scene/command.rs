//! Discrete scene commands produced by the input layer.

use glam::Vec2;

use crate::camera::controller::MoveDirection;
use crate::camera::rig::ViewpointMode;

/// Everything the input layer can ask the scene to do.
///
/// The input processor translates raw window events into these; the
/// scene applies them in [`execute`](crate::scene::Scene::execute).
/// Keeping the commands explicit means the scene never sees key codes
/// or pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    /// Displace the free camera along its own basis.
    MoveCamera {
        /// Direction relative to the camera basis.
        direction: MoveDirection,
        /// Frame delta time in seconds.
        dt: f32,
    },
    /// Rotate the free camera by raw pointer deltas.
    Look {
        /// Pointer delta in pixels (x right, y up).
        delta: Vec2,
    },
    /// Narrow or widen the free camera's field of view.
    Zoom {
        /// Scroll delta (positive narrows).
        delta: f32,
    },
    /// Roll the free camera about its forward axis.
    Roll {
        /// Roll delta in degrees.
        delta_degrees: f32,
    },
    /// Switch the active viewpoint.
    SelectViewpoint(ViewpointMode),
    /// Toggle between day and night lighting.
    ToggleNight,
    /// Toggle between per-pixel and per-vertex shading.
    ToggleShadingModel,
    /// Tilt the headlight beams in car-local space.
    AimHeadlights {
        /// Aim delta: x steers sideways, y tilts up/down.
        delta: Vec2,
    },
    /// Brighten or dim the headlights (clamped to [0, 1]).
    AdjustHeadlightIntensity {
        /// Intensity delta.
        delta: f32,
    },
}
