//! Windowing and input collaborator contract
//!
//! Event polling and key state belong to the platform layer; the engine
//! consumes them through [`InputCollaborator`]. [`NullInput`] serves
//! headless runs and tests.

/// Keys the engine core reacts to or forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Q key
    Q,
    /// E key
    E,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space bar
    Space,
    /// Escape key
    Escape,
}

/// Events surfaced by the windowing collaborator each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window close button was pressed
    CloseRequested,

    /// The window surface changed size
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// A key changed state
    Key {
        /// Affected key
        key: KeyCode,
        /// `true` on press, `false` on release
        pressed: bool,
    },
}

/// Windowing/input collaborator polled once per frame
pub trait InputCollaborator {
    /// Drain events accumulated since the previous poll
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Query current key state
    fn is_key_pressed(&self, key: KeyCode) -> bool;
}

/// Input collaborator that never reports events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputCollaborator for NullInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }

    fn is_key_pressed(&self, _key: KeyCode) -> bool {
        false
    }
}
