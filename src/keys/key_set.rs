//! Ordered set of keys across an octave range.

use std::ops::RangeInclusive;

use super::key::Key;
use super::note::{Note, NOTES_PER_OCTAVE};
use crate::error::{KeyboardError, Result};

/// Every key between two octaves (inclusive), in ascending pitch order.
///
/// Keys are generated once and never mutated; a new range means a new set.
#[derive(Clone, Debug)]
pub struct KeySet {
    start_octave: i32,
    end_octave: i32,
    keys: Vec<Key>,
}

impl KeySet {
    /// Generate all twelve keys of each octave from `start_octave` to
    /// `end_octave` inclusive.
    pub fn generate(start_octave: i32, end_octave: i32) -> Result<Self> {
        if start_octave > end_octave {
            return Err(KeyboardError::InvalidRange {
                start: start_octave,
                end: end_octave,
            });
        }

        let octave_count = end_octave
            .checked_sub(start_octave)
            .and_then(|span| span.checked_add(1))
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(KeyboardError::InvalidRange {
                start: start_octave,
                end: end_octave,
            })?;
        let mut keys = Vec::with_capacity(octave_count * NOTES_PER_OCTAVE);
        for octave in start_octave..=end_octave {
            keys.extend(Note::ALL.iter().map(|&note| Key::new(note, octave)));
        }

        Ok(Self {
            start_octave,
            end_octave,
            keys,
        })
    }

    /// All keys in pitch order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false for a generated set, kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn start_octave(&self) -> i32 {
        self.start_octave
    }

    pub fn end_octave(&self) -> i32 {
        self.end_octave
    }

    /// The generated octave range.
    pub fn octaves(&self) -> RangeInclusive<i32> {
        self.start_octave..=self.end_octave
    }

    /// White keys in playing order.
    pub fn natural_keys(&self) -> Vec<Key> {
        self.keys.iter().copied().filter(|k| !k.is_accidental()).collect()
    }

    /// Black keys in playing order.
    pub fn accidental_keys(&self) -> Vec<Key> {
        self.keys.iter().copied().filter(|k| k.is_accidental()).collect()
    }

    /// The twelve keys of one octave, empty when outside the range.
    pub fn octave_keys(&self, octave: i32) -> &[Key] {
        if !self.octaves().contains(&octave) {
            return &[];
        }
        let start = (octave - self.start_octave) as usize * NOTES_PER_OCTAVE;
        &self.keys[start..start + NOTES_PER_OCTAVE]
    }

    /// The stored key for a note and octave.
    pub fn find(&self, note: Note, octave: i32) -> Option<Key> {
        self.octave_keys(octave)
            .get(note.chromatic_offset() as usize)
            .copied()
    }

    /// Whether `key` belongs to this set.
    pub fn contains(&self, key: &Key) -> bool {
        self.find(key.note, key.octave).is_some()
    }

    /// The black key drawn over the right edge of a white key.
    ///
    /// Returns `None` for E and B. Fails when `natural` is itself an accidental
    /// or is not part of this set.
    pub fn next_accidental(&self, natural: &Key) -> Result<Option<Key>> {
        if natural.is_accidental() {
            return Err(KeyboardError::InvalidArgument(format!(
                "{} is an accidental key",
                natural
            )));
        }
        if !self.contains(natural) {
            return Err(KeyboardError::InvalidArgument(format!(
                "{} is outside octaves {}-{}",
                natural, self.start_octave, self.end_octave
            )));
        }

        Ok(natural
            .note
            .following_accidental()
            .and_then(|note| self.find(note, natural.octave)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_order() {
        for (start, end) in [(1, 7), (2, 6), (4, 4), (-1, 9)] {
            let set = KeySet::generate(start, end).unwrap();
            assert_eq!(set.len(), 12 * (end - start + 1) as usize);
            assert!(set
                .keys()
                .windows(2)
                .all(|w| w[0].note.midi_note(w[0].octave) < w[1].note.midi_note(w[1].octave)));
        }
    }

    #[test]
    fn test_generate_default_range() {
        let set = KeySet::generate(1, 7).unwrap();
        assert_eq!(set.len(), 84);
        assert_eq!(set.keys()[0].display_name(), "C1");
        assert_eq!(set.keys()[83].display_name(), "B7");
    }

    #[test]
    fn test_generate_invalid_range() {
        let err = KeySet::generate(5, 2).unwrap_err();
        assert_eq!(err, KeyboardError::InvalidRange { start: 5, end: 2 });
    }

    #[test]
    fn test_generate_rejects_overflowing_range() {
        assert_eq!(
            KeySet::generate(i32::MIN, i32::MAX).unwrap_err(),
            KeyboardError::InvalidRange {
                start: i32::MIN,
                end: i32::MAX
            }
        );
    }

    #[test]
    fn test_natural_and_accidental_projections() {
        let set = KeySet::generate(3, 4).unwrap();
        let naturals = set.natural_keys();
        let accidentals = set.accidental_keys();

        assert_eq!(naturals.len(), 14);
        assert_eq!(accidentals.len(), 10);
        assert!(naturals.iter().all(|k| !k.is_accidental()));
        assert!(accidentals.iter().all(|k| k.is_accidental()));
        assert_eq!(naturals[0].display_name(), "C3");
        assert_eq!(naturals[7].display_name(), "C4");
        assert_eq!(accidentals[5].display_name(), "C#4");
    }

    #[test]
    fn test_projections_keep_identity() {
        let set = KeySet::generate(4, 4).unwrap();
        assert_eq!(set.natural_keys()[0].id(), set.keys()[0].id());
    }

    #[test]
    fn test_octave_keys() {
        let set = KeySet::generate(2, 6).unwrap();
        let octave = set.octave_keys(4);
        assert_eq!(octave.len(), 12);
        assert!(octave.iter().all(|k| k.octave == 4));
        assert!(set.octave_keys(7).is_empty());
        assert!(set.octave_keys(1).is_empty());
    }

    #[test]
    fn test_next_accidental() {
        let set = KeySet::generate(1, 7).unwrap();
        for octave in set.octaves() {
            for note in [Note::E, Note::B] {
                let key = set.find(note, octave).unwrap();
                assert_eq!(set.next_accidental(&key).unwrap(), None);
            }
        }

        let f4 = set.find(Note::F, 4).unwrap();
        let sharp = set.next_accidental(&f4).unwrap().unwrap();
        assert!(sharp.is(Note::FSharp, 4));
        assert_eq!(sharp.id(), set.find(Note::FSharp, 4).unwrap().id());

        for (natural, accidental) in [
            (Note::C, Note::CSharp),
            (Note::D, Note::DSharp),
            (Note::G, Note::GSharp),
            (Note::A, Note::ASharp),
        ] {
            let key = set.find(natural, 2).unwrap();
            assert!(set.next_accidental(&key).unwrap().unwrap().is(accidental, 2));
        }
    }

    #[test]
    fn test_next_accidental_rejects_bad_keys() {
        let set = KeySet::generate(2, 6).unwrap();
        let sharp = set.find(Note::CSharp, 4).unwrap();
        assert!(matches!(
            set.next_accidental(&sharp),
            Err(KeyboardError::InvalidArgument(_))
        ));

        let outside = Key::new(Note::C, 7);
        assert!(matches!(
            set.next_accidental(&outside),
            Err(KeyboardError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_contains() {
        let set = KeySet::generate(2, 6).unwrap();
        assert!(set.contains(&Key::new(Note::A, 2)));
        assert!(!set.contains(&Key::new(Note::A, 1)));
    }
}
