use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical buttons the simulation understands. Hosts map raw key codes onto
/// these before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    SwapCharacter,
}

/// Pressed-button set sampled once per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input state with the given keys held.
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            pressed: keys.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// -1 for left, +1 for right, 0 for neither. Left wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.is_pressed(Key::Left) {
            -1.0
        } else if self.is_pressed(Key::Right) {
            1.0
        } else {
            0.0
        }
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}
