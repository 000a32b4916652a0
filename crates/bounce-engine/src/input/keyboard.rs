//! Level-triggered keyboard state.

use std::collections::HashSet;

use crate::input::queue::InputEvent;

/// DOM `keyCode` values the engine names.
pub mod key_codes {
    pub const SHIFT: u32 = 16;
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
}

/// Set of keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    held: HashSet<u32>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the held set. Non-keyboard events are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => {
                self.held.insert(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
            InputEvent::Blur => self.reset(),
            _ => {}
        }
    }

    pub fn is_down(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    /// Release every key.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

/// A single key binding, read against the live keyboard each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding(pub u32);

impl KeyBinding {
    pub fn is_down(self, keyboard: &Keyboard) -> bool {
        keyboard.is_down(self.0)
    }

    pub fn is_up(self, keyboard: &Keyboard) -> bool {
        !keyboard.is_down(self.0)
    }
}

/// Arrow keys plus space and shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorKeys {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub left: KeyBinding,
    pub right: KeyBinding,
    pub space: KeyBinding,
    pub shift: KeyBinding,
}

impl Default for CursorKeys {
    fn default() -> Self {
        Self {
            up: KeyBinding(key_codes::UP),
            down: KeyBinding(key_codes::DOWN),
            left: KeyBinding(key_codes::LEFT),
            right: KeyBinding(key_codes::RIGHT),
            space: KeyBinding(key_codes::SPACE),
            shift: KeyBinding(key_codes::SHIFT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_until_released() {
        let mut kb = Keyboard::new();
        let cursors = CursorKeys::default();
        kb.apply(&InputEvent::KeyDown { key_code: key_codes::LEFT });
        assert!(cursors.left.is_down(&kb));
        assert!(cursors.right.is_up(&kb));
        kb.apply(&InputEvent::KeyUp { key_code: key_codes::LEFT });
        assert!(cursors.left.is_up(&kb));
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut kb = Keyboard::new();
        kb.apply(&InputEvent::KeyDown { key_code: key_codes::UP });
        kb.apply(&InputEvent::KeyDown { key_code: key_codes::UP });
        kb.apply(&InputEvent::KeyUp { key_code: key_codes::UP });
        assert!(!kb.is_down(key_codes::UP));
    }

    #[test]
    fn blur_releases_everything() {
        let mut kb = Keyboard::new();
        kb.apply(&InputEvent::KeyDown { key_code: key_codes::LEFT });
        kb.apply(&InputEvent::KeyDown { key_code: key_codes::UP });
        kb.apply(&InputEvent::Blur);
        assert!(!kb.is_down(key_codes::LEFT));
        assert!(!kb.is_down(key_codes::UP));
    }
}
