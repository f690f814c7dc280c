//! Engine module
//!
//! The note sink contract and the sound backends that implement it: a MIDI
//! output port (midir) and a built-in sine synth (cpal).

pub mod backend;
pub mod messages;
pub mod midi_out;
pub mod sink;
pub mod synth;

pub use backend::Backend;
pub use messages::{NoteMessage, CC_ALL_NOTES_OFF};
pub use midi_out::{MidiDeviceInfo, MidiError, MidiOutSink};
pub use sink::{AudioStatus, Dispatch, NoteSink, NullSink, ReadinessPolicy, SinkError, SinkGate};
pub use synth::{AudioError, SynthSink, VoiceBank, MAX_VOICES};
