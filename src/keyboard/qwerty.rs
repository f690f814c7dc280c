//! Computer keyboard input.
//!
//! Maps QWERTY keys onto piano keys relative to C of the current octave, so the
//! keyboard can be played without a pointer.

use egui::Key as InputKey;

use crate::keys::{Key, KeySet, Note, NOTES_PER_OCTAVE};

/// Semitone offset above C of the current octave for a computer key.
///
/// Uses a piano-like layout where:
/// - Bottom row (Z, X, C, V, B, N, M, comma, period, slash) = white keys
/// - Home row (S, D, G, H, J, L, semicolon) = black keys
/// - Top row (Q to P) = the bottom row's white keys again, C to E of the next octave
///
/// Returns None if the key doesn't map to a note.
pub fn input_offset(input: InputKey) -> Option<i32> {
    match input {
        // White keys
        InputKey::Z => Some(0),       // C
        InputKey::X => Some(2),       // D
        InputKey::C => Some(4),       // E
        InputKey::V => Some(5),       // F
        InputKey::B => Some(7),       // G
        InputKey::N => Some(9),       // A
        InputKey::M => Some(11),      // B
        InputKey::Comma => Some(12),  // C (next octave)
        InputKey::Period => Some(14), // D (next octave)
        InputKey::Slash => Some(16),  // E (next octave)

        // Black keys
        InputKey::S => Some(1),          // C#
        InputKey::D => Some(3),          // D#
        InputKey::G => Some(6),          // F#
        InputKey::H => Some(8),          // G#
        InputKey::J => Some(10),         // A#
        InputKey::L => Some(13),         // C# (next octave)
        InputKey::Semicolon => Some(15), // D# (next octave)

        // Top row, white keys again
        InputKey::Q => Some(0),  // C
        InputKey::W => Some(2),  // D
        InputKey::E => Some(4),  // E
        InputKey::R => Some(5),  // F
        InputKey::T => Some(7),  // G
        InputKey::Y => Some(9),  // A
        InputKey::U => Some(11), // B
        InputKey::I => Some(12), // C (next octave)
        InputKey::O => Some(14), // D (next octave)
        InputKey::P => Some(16), // E (next octave)

        _ => None,
    }
}

/// The piano key a computer key plays in `octave`, if it is inside `keys`.
pub fn input_key(input: InputKey, octave: i32, keys: &KeySet) -> Option<Key> {
    let offset = input_offset(input)?;
    let octave = octave + offset.div_euclid(NOTES_PER_OCTAVE as i32);
    let note = Note::from_offset(offset.rem_euclid(NOTES_PER_OCTAVE as i32) as u8);
    keys.find(note, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_offsets() {
        // White keys
        assert_eq!(input_offset(InputKey::Z), Some(0));
        assert_eq!(input_offset(InputKey::X), Some(2));
        assert_eq!(input_offset(InputKey::C), Some(4));
        assert_eq!(input_offset(InputKey::V), Some(5));
        assert_eq!(input_offset(InputKey::M), Some(11));

        // Black keys
        assert_eq!(input_offset(InputKey::S), Some(1));
        assert_eq!(input_offset(InputKey::J), Some(10));

        // Non-note keys
        assert_eq!(input_offset(InputKey::Space), None);
        assert_eq!(input_offset(InputKey::Escape), None);
    }

    #[test]
    fn test_top_row_mirrors_white_keys() {
        let top = [
            InputKey::Q,
            InputKey::W,
            InputKey::E,
            InputKey::R,
            InputKey::T,
            InputKey::Y,
            InputKey::U,
            InputKey::I,
            InputKey::O,
            InputKey::P,
        ];
        let bottom = [
            InputKey::Z,
            InputKey::X,
            InputKey::C,
            InputKey::V,
            InputKey::B,
            InputKey::N,
            InputKey::M,
            InputKey::Comma,
            InputKey::Period,
            InputKey::Slash,
        ];
        for (t, b) in top.iter().zip(bottom.iter()) {
            assert_eq!(input_offset(*t), input_offset(*b));
        }

        let keys = KeySet::generate(2, 6).unwrap();
        assert!(input_key(InputKey::W, 4, &keys).unwrap().is(Note::D, 4));
        assert!(!input_key(InputKey::T, 4, &keys).unwrap().is_accidental());
    }

    #[test]
    fn test_input_key_in_current_octave() {
        let keys = KeySet::generate(2, 6).unwrap();
        assert!(input_key(InputKey::Z, 4, &keys).unwrap().is(Note::C, 4));
        assert!(input_key(InputKey::G, 4, &keys).unwrap().is(Note::FSharp, 4));
        assert_eq!(input_key(InputKey::Z, 4, &keys).unwrap().midi_note(), 60);
    }

    #[test]
    fn test_input_key_wraps_into_next_octave() {
        let keys = KeySet::generate(2, 6).unwrap();
        assert!(input_key(InputKey::Comma, 4, &keys).unwrap().is(Note::C, 5));
        assert!(input_key(InputKey::Semicolon, 3, &keys).unwrap().is(Note::DSharp, 4));
    }

    #[test]
    fn test_input_key_outside_range() {
        let keys = KeySet::generate(2, 6).unwrap();
        assert!(input_key(InputKey::Comma, 6, &keys).is_none());
        assert!(input_key(InputKey::Space, 4, &keys).is_none());
    }
}
