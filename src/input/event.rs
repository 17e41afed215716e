/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor)
/// which converts them into [`SceneCommand`](crate::SceneCommand)
/// values. Key codes use the `winit::keyboard::KeyCode` debug format
/// (`"KeyW"`, `"Digit1"`, `"PageUp"`, ...) so the processor stays free
/// of winit types.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute screen position.
    ///
    /// The processor derives deltas itself; callers never pre-compute
    /// them.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels (down is positive).
        y: f32,
    },
    /// Scroll wheel (positive narrows the field of view).
    Scroll {
        /// Scroll amount in lines.
        delta: f32,
    },
    /// A key changed state.
    Key {
        /// Physical key code string.
        code: String,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
}

#[cfg(feature = "viewer")]
impl InputEvent {
    /// Convert a winit keyboard event into the key-string form.
    #[must_use]
    pub fn from_key_event(event: &winit::event::KeyEvent) -> Option<Self> {
        if let winit::keyboard::PhysicalKey::Code(code) = event.physical_key {
            Some(Self::Key {
                code: format!("{code:?}"),
                pressed: event.state == winit::event::ElementState::Pressed,
            })
        } else {
            None
        }
    }
}
