//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (camera feel, day/night lighting, key
//! bindings) are consolidated here. Options serialize to/from TOML so a
//! tweaked setup can be kept next to the assets and loaded at startup.

mod camera;
mod lighting;

use std::path::Path;

pub use camera::CameraOptions;
pub use lighting::{LightingOptions, SkyPreset};
use serde::{Deserialize, Serialize};

use crate::error::NightdriveError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[lighting]`) work
/// correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera movement and look parameters.
    pub camera: CameraOptions,
    /// Day/night lighting and fog parameters.
    pub lighting: LightingOptions,
    /// Keyboard binding options for discrete actions.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NightdriveError::Io`] when the file cannot be read and
    /// [`NightdriveError::OptionsParse`] when it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, NightdriveError> {
        let content =
            std::fs::read_to_string(path).map_err(NightdriveError::Io)?;
        toml::from_str(&content)
            .map_err(|e| NightdriveError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`NightdriveError::OptionsParse`] when serialization
    /// fails and [`NightdriveError::Io`] when the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), NightdriveError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NightdriveError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(NightdriveError::Io)?;
        }
        std::fs::write(path, content).map_err(NightdriveError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
move_speed = 25.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.camera.move_speed, 25.0);
        // Everything else should be default
        assert_eq!(opts.camera.look_sensitivity, 0.05);
        assert_eq!(opts.lighting.headlight_intensity, 0.5);
        assert!(!opts.lighting.start_at_night);
    }

    #[test]
    fn day_and_night_presets_differ() {
        let opts = LightingOptions::default();
        assert!(opts.night.fog_density > opts.day.fog_density);
        assert_ne!(opts.day.clear_color, opts.night.clear_color);
    }
}
