use serde::{Deserialize, Serialize};

use crate::camera::rig::ViewpointMode;
use crate::scene::command::SceneCommand;

/// Discrete actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay
/// readable:
/// ```toml
/// [keybindings]
/// toggle_night = "KeyN"
/// view_follow = "Digit3"
/// ```
///
/// Continuous controls (movement, roll, headlight aim) are not
/// bindable; they are sampled from held keys by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Switch to the free-flight viewpoint.
    ViewFree,
    /// Switch to the fixed top viewpoint.
    ViewTop,
    /// Switch to the car-follow viewpoint.
    ViewFollow,
    /// Toggle day/night lighting.
    ToggleNight,
    /// Toggle Phong/Gouraud shading.
    ToggleShading,
}

impl KeyAction {
    /// Convert to the corresponding parameterless [`SceneCommand`].
    #[must_use]
    pub fn to_command(self) -> SceneCommand {
        match self {
            Self::ViewFree => {
                SceneCommand::SelectViewpoint(ViewpointMode::Free)
            }
            Self::ViewTop => SceneCommand::SelectViewpoint(ViewpointMode::Top),
            Self::ViewFollow => {
                SceneCommand::SelectViewpoint(ViewpointMode::Follow)
            }
            Self::ToggleNight => SceneCommand::ToggleNight,
            Self::ToggleShading => SceneCommand::ToggleShadingModel,
        }
    }
}
