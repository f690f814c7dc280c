//! Pressed-key tracking.

use std::collections::BTreeSet;

use crate::keys::Key;

/// The set of keys currently held down.
///
/// This is what the presentation layer reads to highlight keys. Press and
/// release are idempotent so overlapping gesture callbacks cannot double-count.
/// Membership in the active key set is checked by the session, not here.
#[derive(Clone, Debug, Default)]
pub struct PressState {
    pressed: BTreeSet<Key>,
}

impl PressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as held. Returns true if it was not held before.
    pub fn press(&mut self, key: Key) -> bool {
        self.pressed.insert(key)
    }

    /// Mark `key` as released. Returns true if it was held.
    pub fn release(&mut self, key: &Key) -> bool {
        self.pressed.remove(key)
    }

    pub fn is_pressed(&self, key: &Key) -> bool {
        self.pressed.contains(key)
    }

    /// Number of held keys.
    pub fn count(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Held keys from lowest to highest.
    pub fn iter(&self) -> impl Iterator<Item = &Key> + '_ {
        self.pressed.iter()
    }

    /// MIDI note numbers of the held keys, lowest first.
    pub fn active_notes(&self) -> Vec<u8> {
        self.pressed.iter().map(Key::midi_note).collect()
    }
}
