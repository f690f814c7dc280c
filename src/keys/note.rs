//! Pitch model.
//!
//! The twelve chromatic pitch classes, their natural/accidental split and the
//! mapping from (note, octave) to a MIDI note number.

use std::fmt;

/// MIDI note number of C4 (middle C).
pub const MIDDLE_C: i32 = 60;

/// Octave that contains middle C.
pub const MIDDLE_C_OCTAVE: i32 = 4;

/// Number of pitch classes in an octave.
pub const NOTES_PER_OCTAVE: usize = 12;

/// A chromatic pitch class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    /// All pitch classes in ascending pitch order.
    pub const ALL: [Note; NOTES_PER_OCTAVE] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Semitones above C (C = 0, B = 11).
    pub fn chromatic_offset(self) -> u8 {
        match self {
            Note::C => 0,
            Note::CSharp => 1,
            Note::D => 2,
            Note::DSharp => 3,
            Note::E => 4,
            Note::F => 5,
            Note::FSharp => 6,
            Note::G => 7,
            Note::GSharp => 8,
            Note::A => 9,
            Note::ASharp => 10,
            Note::B => 11,
        }
    }

    /// Pitch class for a semitone offset above C. Offsets wrap every octave.
    pub fn from_offset(offset: u8) -> Self {
        Self::ALL[offset as usize % NOTES_PER_OCTAVE]
    }

    /// True for the five sharps (the black keys).
    pub fn is_accidental(self) -> bool {
        matches!(
            self,
            Note::CSharp | Note::DSharp | Note::FSharp | Note::GSharp | Note::ASharp
        )
    }

    /// MIDI note number for this pitch class in `octave`.
    ///
    /// Not clamped to 0..=127: octaves outside -1..=9 give numbers outside the
    /// MIDI range and the caller is expected to validate the octave first.
    /// Saturates at the ends of `i32`.
    pub fn midi_note(self, octave: i32) -> i32 {
        octave
            .saturating_sub(MIDDLE_C_OCTAVE)
            .saturating_mul(NOTES_PER_OCTAVE as i32)
            .saturating_add(MIDDLE_C + self.chromatic_offset() as i32)
    }

    /// The sharp sitting directly above a natural, if any.
    ///
    /// E and B have no black key above them; accidentals have no following
    /// accidental either.
    pub fn following_accidental(self) -> Option<Note> {
        match self {
            Note::C => Some(Note::CSharp),
            Note::D => Some(Note::DSharp),
            Note::F => Some(Note::FSharp),
            Note::G => Some(Note::GSharp),
            Note::A => Some(Note::ASharp),
            _ => None,
        }
    }

    /// Short display name ("C", "C#", ...).
    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chromatic_offsets() {
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.chromatic_offset() as usize, i);
            assert_eq!(Note::from_offset(i as u8), *note);
        }
        assert_eq!(Note::from_offset(12), Note::C);
        assert_eq!(Note::from_offset(13), Note::CSharp);
    }

    #[test]
    fn test_accidentals() {
        let accidentals: Vec<Note> = Note::ALL.iter().copied().filter(|n| n.is_accidental()).collect();
        assert_eq!(
            accidentals,
            vec![Note::CSharp, Note::DSharp, Note::FSharp, Note::GSharp, Note::ASharp]
        );
    }

    #[test]
    fn test_midi_note() {
        assert_eq!(Note::C.midi_note(4), 60);
        assert_eq!(Note::C.midi_note(5), 72);
        assert_eq!(Note::B.midi_note(3), 59);
        assert_eq!(Note::A.midi_note(4), 69);
        assert_eq!(Note::C.midi_note(-1), 0);
        assert_eq!(Note::G.midi_note(9), 127);
    }

    #[test]
    fn test_midi_note_is_unclamped() {
        assert_eq!(Note::C.midi_note(-2), -12);
        assert_eq!(Note::GSharp.midi_note(9), 128);
    }

    #[test]
    fn test_midi_note_saturates_on_extreme_octaves() {
        assert_eq!(Note::C.midi_note(i32::MAX), i32::MAX);
        assert_eq!(Note::B.midi_note(i32::MIN), i32::MIN);
    }

    #[test]
    fn test_following_accidental() {
        assert_eq!(Note::C.following_accidental(), Some(Note::CSharp));
        assert_eq!(Note::D.following_accidental(), Some(Note::DSharp));
        assert_eq!(Note::F.following_accidental(), Some(Note::FSharp));
        assert_eq!(Note::G.following_accidental(), Some(Note::GSharp));
        assert_eq!(Note::A.following_accidental(), Some(Note::ASharp));
        assert_eq!(Note::E.following_accidental(), None);
        assert_eq!(Note::B.following_accidental(), None);
        assert_eq!(Note::CSharp.following_accidental(), None);
    }

    #[test]
    fn test_note_names() {
        assert_eq!(Note::C.to_string(), "C");
        assert_eq!(Note::FSharp.to_string(), "F#");
    }
}
