//! Input handling: event types and the edge-triggered processor that
//! converts raw window events into scene commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable discrete actions.
pub mod keyboard;
/// Converts raw events into scene commands.
pub mod processor;

pub use event::InputEvent;
pub use keyboard::KeyAction;
pub use processor::{InputProcessor, KeyBindings};
