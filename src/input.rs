//! Keyboard to gameplay intent mapping
//!
//! Each direction has two bindings (arrow and letter).

use serde::{Deserialize, Serialize};

/// Keys the host may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    Space,
    Escape,
}

/// What the player wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Map a key to its gameplay intent, if it has one
pub fn intent_for(key: Key) -> Option<Intent> {
    match key {
        Key::Left | Key::A => Some(Intent::MoveLeft),
        Key::Right | Key::D => Some(Intent::MoveRight),
        Key::Up | Key::W => Some(Intent::Jump),
        _ => None,
    }
}
