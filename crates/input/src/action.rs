use std::collections::HashSet;

/// Keys the game cares about. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Escape,
    Other,
}

/// A raw key transition as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
    /// Set by the OS for auto-repeated presses while the key is held.
    pub repeat: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            pressed: true,
            repeat: false,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
            repeat: false,
        }
    }
}

/// A high-level action produced from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a round, or jump if one is running.
    Jump,
    /// Close the window and exit, whatever the game state.
    Quit,
    /// Nothing bound, or a repeat of a key that is already down.
    Noop,
}

/// Maps key events to actions, emitting only on the press edge.
#[derive(Debug, Default)]
pub struct KeyMap {
    held: HashSet<Key>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn handle(&mut self, event: KeyEvent) -> Action {
        if !event.pressed {
            self.held.remove(&event.key);
            return Action::Noop;
        }
        let first_press = self.held.insert(event.key);
        if event.repeat || !first_press {
            return Action::Noop;
        }
        let action = match event.key {
            Key::Space => Action::Jump,
            Key::Escape => Action::Quit,
            Key::Other => Action::Noop,
        };
        tracing::trace!(?event.key, ?action, "key press");
        action
    }
}
