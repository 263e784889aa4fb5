/// Input vocabulary shared by the driver and every state.
///
/// The driver turns raw terminal events into [`GameEvent`]s (one-shot, in
/// arrival order) and a [`Controls`] snapshot (keys currently held).

use std::collections::HashMap;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Terminals without release reporting only send repeated
/// presses, and the OS repeat rate refreshes the key well inside the window.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Confirm,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    KeyDown(Key),
    /// Recurring trigger: one alien in the wave fires.
    AlienFire,
    /// Re-armed trigger: a bonus extra crosses the screen.
    ExtraSpawn,
    Quit,
}

/// Keys held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Everything a state sees for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// Wall time since the previous frame, in seconds.
    pub dt: f32,
    pub events: Vec<GameEvent>,
    pub controls: Controls,
}

impl FrameInput {
    pub fn new(dt: f32, events: Vec<GameEvent>, controls: Controls) -> Self {
        Self { dt, events, controls }
    }

    pub fn with_events(events: Vec<GameEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn with_controls(controls: Controls) -> Self {
        Self {
            controls,
            ..Self::default()
        }
    }
}

/// Tracks the frame on which each key was last seen pressed.
#[derive(Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<Key, u64>,
}

impl HeldKeys {
    pub fn press(&mut self, key: Key, frame: u64) {
        self.last_seen.insert(key, frame);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn is_held(&self, key: Key, frame: u64) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn controls(&self, frame: u64) -> Controls {
        Controls {
            left: self.is_held(Key::Left, frame),
            right: self.is_held(Key::Right, frame),
            fire: self.is_held(Key::Fire, frame),
        }
    }
}
