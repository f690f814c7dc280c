//! Piano key value type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::note::Note;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

/// Display identity of a key instance.
///
/// Used by the presentation layer to diff key widgets between frames. It never
/// takes part in key equality: two keys with the same note and octave are equal
/// whatever their ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u64);

impl KeyId {
    fn next() -> Self {
        Self(NEXT_KEY_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A single piano key.
#[derive(Clone, Copy, Debug)]
pub struct Key {
    /// Pitch class of the key.
    pub note: Note,
    /// Octave number (4 holds middle C).
    pub octave: i32,
    id: KeyId,
}

impl Key {
    /// Create a key with a fresh display identity.
    pub fn new(note: Note, octave: i32) -> Self {
        Self {
            note,
            octave,
            id: KeyId::next(),
        }
    }

    /// Display identity, see [`KeyId`].
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// True for black keys.
    pub fn is_accidental(&self) -> bool {
        self.note.is_accidental()
    }

    /// MIDI note number clamped to 0-127.
    pub fn midi_note(&self) -> u8 {
        self.note.midi_note(self.octave).clamp(0, 127) as u8
    }

    /// Name with octave, e.g. "C#4".
    pub fn display_name(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }

    /// True when note and octave match, ignoring identity.
    pub fn is(&self, note: Note, octave: i32) -> bool {
        self.note == note && self.octave == octave
    }

    fn pitch(&self) -> (i32, u8) {
        (self.octave, self.note.chromatic_offset())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.note == other.note && self.octave == other.octave
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.note.hash(state);
        self.octave.hash(state);
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pitch().cmp(&other.pitch())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}
