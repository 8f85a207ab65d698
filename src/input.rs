//! Input query surface
//!
//! The windowing layer is an external collaborator; the engine only consumes
//! this observable state. The driver feeds key/pointer transitions in and
//! calls `begin_frame` once per outer tick so edge queries (pressed/released
//! this frame) stay well defined.

use rustc_hash::FxHashSet;

/// Keyboard keys the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    Space,
    LShift,
    LControl,
    Tab,
    Escape,
    Return,
    Up,
    Down,
    Left,
    Right,
    Key1,
    Key2,
    Key3,
    Key4,
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Snapshot of keyboard and pointer state
#[derive(Debug, Default)]
pub struct InputState {
    held: FxHashSet<KeyCode>,
    pressed: FxHashSet<KeyCode>,
    released: FxHashSet<KeyCode>,
    buttons: FxHashSet<PointerButton>,
    pointer_position: [f32; 2],
    pointer_delta: [f32; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame edges; call once at the top of each outer tick
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.pointer_delta = [0.0, 0.0];
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn press_pointer(&mut self, button: PointerButton) {
        self.buttons.insert(button);
    }

    pub fn release_pointer(&mut self, button: PointerButton) {
        self.buttons.remove(&button);
    }

    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.pointer_delta[0] += x - self.pointer_position[0];
        self.pointer_delta[1] += y - self.pointer_position[1];
        self.pointer_position = [x, y];
    }

    /// True while the key is down
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// True only on the frame the key went down
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// True only on the frame the key came up
    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    pub fn is_pointer_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn pointer_position(&self) -> [f32; 2] {
        self.pointer_position
    }

    /// Pointer movement accumulated since `begin_frame`
    pub fn pointer_delta(&self) -> [f32; 2] {
        self.pointer_delta
    }
}
