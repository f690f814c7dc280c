//! Note messages
//!
//! The messages a keyboard sends to a backend, shared by the MIDI output and
//! the built-in synth. All types here are Send + Copy so they can cross into
//! audio and MIDI threads through lock-free queues.

/// MIDI controller number for "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// A note event headed for a sound backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMessage {
    /// Start a note.
    NoteOn {
        /// Note number (0-127).
        note: u8,
        /// Velocity (1-127).
        velocity: u8,
    },
    /// Stop a note.
    NoteOff {
        /// Note number (0-127).
        note: u8,
    },
    /// Stop every note.
    AllNotesOff,
}

impl NoteMessage {
    /// Encode as a three-byte MIDI channel message on `channel` (0-15).
    pub fn to_bytes(&self, channel: u8) -> [u8; 3] {
        let channel = channel & 0x0F;
        match *self {
            NoteMessage::NoteOn { note, velocity } => [0x90 | channel, note & 0x7F, velocity & 0x7F],
            NoteMessage::NoteOff { note } => [0x80 | channel, note & 0x7F, 0],
            NoteMessage::AllNotesOff => [0xB0 | channel, CC_ALL_NOTES_OFF, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_bytes() {
        let msg = NoteMessage::NoteOn {
            note: 60,
            velocity: 100,
        };
        assert_eq!(msg.to_bytes(0), [0x90, 60, 100]);
        assert_eq!(msg.to_bytes(9), [0x99, 60, 100]);
    }

    #[test]
    fn test_note_off_bytes() {
        assert_eq!(NoteMessage::NoteOff { note: 62 }.to_bytes(0), [0x80, 62, 0]);
    }

    #[test]
    fn test_all_notes_off_bytes() {
        assert_eq!(NoteMessage::AllNotesOff.to_bytes(2), [0xB2, 123, 0]);
    }

    #[test]
    fn test_channel_is_masked() {
        assert_eq!(NoteMessage::AllNotesOff.to_bytes(0x1F)[0], 0xBF);
    }

    #[test]
    fn test_message_is_send() {
        fn assert_send<T: Send + Copy>() {}
        assert_send::<NoteMessage>();
    }
}
