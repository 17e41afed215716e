//! Converts raw platform events into scene commands.
//!
//! The `InputProcessor` owns all transient input state (pointer
//! tracking, the held-key set, the key-binding map). It is the only
//! thing between raw window events and
//! [`Scene::execute`](crate::scene::Scene::execute), which keeps the
//! camera controller itself free of input-timing concerns: spurious
//! first-pointer-event suppression and press/release edge detection
//! both live here.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::InputEvent;
use super::keyboard::KeyAction;
use crate::camera::controller::MoveDirection;
use crate::scene::command::SceneCommand;

/// Roll rate for the held Q/E keys, degrees per second.
const ROLL_RATE: f32 = 60.0;
/// Headlight aim rate for the held arrow keys, per second.
const AIM_RATE: f32 = 0.3;
/// Headlight intensity rate for the held PageUp/PageDown keys, per
/// second.
const INTENSITY_RATE: f32 = 0.3;

/// Maps physical key strings to [`KeyAction`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"Digit1"`, `"KeyN"`, etc.
///
/// Only *discrete* actions (viewpoint switches, toggles) make sense as
/// key bindings — continuous controls like movement are sampled from
/// the held-key set by [`InputProcessor::frame_commands`], not key
/// lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyBindings {
    /// Forward map: key string -> action.
    bindings: HashMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Digit1".into(), KeyAction::ViewFree),
            ("Digit2".into(), KeyAction::ViewTop),
            ("Digit3".into(), KeyAction::ViewFollow),
            ("KeyN".into(), KeyAction::ToggleNight),
            ("KeyG".into(), KeyAction::ToggleShading),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the action for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`SceneCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = processor.handle_event(&event) {
///     scene.execute(cmd);
/// }
///
/// // Once per frame, for held keys:
/// for cmd in processor.frame_commands(dt) {
///     scene.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last known cursor position; `None` until the first move event,
    /// whose jump-from-nowhere delta must be swallowed.
    last_cursor: Option<Vec2>,
    /// Keys currently held down.
    held: HashSet<String>,
    /// Key string -> discrete action mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_cursor: None,
            held: HashSet::new(),
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Forget the tracked cursor position so the next move event
    /// re-establishes it without producing a look jump. Call when the
    /// pointer re-enters the window or the window regains focus.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// Discrete actions fire on the press *edge* only: a key held down
    /// produces its command exactly once until released.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<SceneCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(*x, *y)
            }
            InputEvent::Scroll { delta } => {
                Some(SceneCommand::Zoom { delta: *delta })
            }
            InputEvent::Key { code, pressed } => {
                if *pressed {
                    if !self.held.insert(code.clone()) {
                        // Auto-repeat while held: not an edge.
                        return None;
                    }
                    self.key_bindings
                        .lookup(code)
                        .map(KeyAction::to_command)
                } else {
                    let _ = self.held.remove(code);
                    None
                }
            }
        }
    }

    /// Cursor moved — compute the delta against the tracked position.
    ///
    /// The first event after tracking begins only establishes the
    /// reference position: the pointer "arrives from nowhere" and a
    /// delta against an arbitrary stale point would yank the view.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<SceneCommand> {
        let current = Vec2::new(x, y);
        let last = self.last_cursor.replace(current)?;
        // Screen y grows downward; looking up is positive pitch.
        let delta = Vec2::new(current.x - last.x, last.y - current.y);
        if delta == Vec2::ZERO {
            return None;
        }
        Some(SceneCommand::Look { delta })
    }

    /// Sample the held-key set into continuous per-frame commands,
    /// scaled by the frame delta time.
    #[must_use]
    pub fn frame_commands(&self, dt: f32) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        let move_keys: [(&str, MoveDirection); 6] = [
            ("KeyW", MoveDirection::Forward),
            ("KeyS", MoveDirection::Backward),
            ("KeyA", MoveDirection::Left),
            ("KeyD", MoveDirection::Right),
            ("Space", MoveDirection::Up),
            ("KeyC", MoveDirection::Down),
        ];
        for (key, direction) in move_keys {
            if self.held.contains(key) {
                commands.push(SceneCommand::MoveCamera { direction, dt });
            }
        }

        if self.held.contains("KeyQ") {
            commands.push(SceneCommand::Roll {
                delta_degrees: -ROLL_RATE * dt,
            });
        }
        if self.held.contains("KeyE") {
            commands.push(SceneCommand::Roll {
                delta_degrees: ROLL_RATE * dt,
            });
        }

        let mut aim = Vec2::ZERO;
        if self.held.contains("ArrowUp") {
            aim.y += AIM_RATE * dt;
        }
        if self.held.contains("ArrowDown") {
            aim.y -= AIM_RATE * dt;
        }
        if self.held.contains("ArrowLeft") {
            aim.x -= AIM_RATE * dt;
        }
        if self.held.contains("ArrowRight") {
            aim.x += AIM_RATE * dt;
        }
        if aim != Vec2::ZERO {
            commands.push(SceneCommand::AimHeadlights { delta: aim });
        }

        if self.held.contains("PageUp") {
            commands.push(SceneCommand::AdjustHeadlightIntensity {
                delta: INTENSITY_RATE * dt,
            });
        }
        if self.held.contains("PageDown") {
            commands.push(SceneCommand::AdjustHeadlightIntensity {
                delta: -INTENSITY_RATE * dt,
            });
        }

        commands
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str, pressed: bool) -> InputEvent {
        InputEvent::Key {
            code: code.to_owned(),
            pressed,
        }
    }

    #[test]
    fn first_cursor_move_produces_no_look() {
        let mut p = InputProcessor::new();
        let first =
            p.handle_event(&InputEvent::CursorMoved { x: 640.0, y: 360.0 });
        assert_eq!(first, None);

        let second =
            p.handle_event(&InputEvent::CursorMoved { x: 650.0, y: 350.0 });
        // Delta is (10, +10): moving the pointer up the screen looks up.
        assert_eq!(
            second,
            Some(SceneCommand::Look {
                delta: Vec2::new(10.0, 10.0)
            })
        );
    }

    #[test]
    fn cursor_reset_rearms_first_move_suppression() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(&InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        p.reset_cursor();
        let after =
            p.handle_event(&InputEvent::CursorMoved { x: 900.0, y: 900.0 });
        assert_eq!(after, None);
    }

    #[test]
    fn toggle_keys_fire_once_per_press() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(&key("KeyN", true)),
            Some(SceneCommand::ToggleNight)
        );
        // Auto-repeat press events while held: no further commands.
        assert_eq!(p.handle_event(&key("KeyN", true)), None);
        assert_eq!(p.handle_event(&key("KeyN", true)), None);
        // Release, press again: fires again.
        assert_eq!(p.handle_event(&key("KeyN", false)), None);
        assert_eq!(
            p.handle_event(&key("KeyN", true)),
            Some(SceneCommand::ToggleNight)
        );
    }

    #[test]
    fn held_movement_keys_emit_scaled_commands() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(&key("KeyW", true));
        let _ = p.handle_event(&key("KeyA", true));
        let commands = p.frame_commands(0.016);
        assert!(commands.contains(&SceneCommand::MoveCamera {
            direction: MoveDirection::Forward,
            dt: 0.016
        }));
        assert!(commands.contains(&SceneCommand::MoveCamera {
            direction: MoveDirection::Left,
            dt: 0.016
        }));
        assert_eq!(commands.len(), 2);

        let _ = p.handle_event(&key("KeyW", false));
        let commands = p.frame_commands(0.016);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn arrow_keys_combine_into_one_aim_command() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(&key("ArrowUp", true));
        let _ = p.handle_event(&key("ArrowRight", true));
        let commands = p.frame_commands(1.0);
        assert_eq!(
            commands,
            vec![SceneCommand::AimHeadlights {
                delta: Vec2::new(AIM_RATE, AIM_RATE)
            }]
        );
    }

    #[test]
    fn scroll_becomes_zoom() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(&InputEvent::Scroll { delta: 2.0 }),
            Some(SceneCommand::Zoom { delta: 2.0 })
        );
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let toml_str = r#"KeyT = "toggle_night""#;
        let bindings: KeyBindings = toml::from_str(toml_str).unwrap();
        let mut p = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            p.handle_event(&key("KeyT", true)),
            Some(SceneCommand::ToggleNight)
        );
        // The default binding is gone.
        assert_eq!(p.handle_event(&key("KeyN", true)), None);
    }
}
