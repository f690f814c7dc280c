//! Key model
//!
//! Pitch classes, individual keys and the ordered key set for an octave range.

pub mod key;
pub mod key_set;
pub mod note;

pub use key::{Key, KeyId};
pub use key_set::KeySet;
pub use note::{Note, MIDDLE_C, NOTES_PER_OCTAVE};
