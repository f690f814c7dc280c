//! Backend selection
//!
//! One concrete sink type for the application, chosen at startup.

use super::midi_out::MidiOutSink;
use super::sink::{NoteSink, NullSink, SinkError};
use super::synth::SynthSink;

/// The sound backend the application plays through.
pub enum Backend {
    /// Built-in sine synth on the default audio output.
    Synth(SynthSink),
    /// External MIDI output port.
    Midi(MidiOutSink),
    /// No sound; keys still light up.
    Silent(NullSink),
}

impl Backend {
    /// Open the built-in synth, falling back to silence when no audio device
    /// is available.
    pub fn synth() -> Self {
        match SynthSink::new() {
            Ok(mut synth) => {
                if let Err(e) = synth.start() {
                    log::warn!("Failed to start synth: {}", e);
                }
                Backend::Synth(synth)
            }
            Err(e) => {
                log::warn!("No audio output, running silent: {}", e);
                Backend::Silent(NullSink)
            }
        }
    }

    /// Open a MIDI output on `channel`, connecting to the first port found.
    pub fn midi(channel: u8) -> Self {
        let mut midi = MidiOutSink::new(channel);
        if let Err(e) = midi.connect_first() {
            log::warn!("MIDI output unavailable: {}", e);
        }
        Backend::Midi(midi)
    }

    /// Short label for the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Synth(_) => "Synth",
            Backend::Midi(_) => "MIDI Out",
            Backend::Silent(_) => "Silent",
        }
    }

    fn inner(&self) -> &dyn NoteSink {
        match self {
            Backend::Synth(s) => s,
            Backend::Midi(m) => m,
            Backend::Silent(n) => n,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn NoteSink {
        match self {
            Backend::Synth(s) => s,
            Backend::Midi(m) => m,
            Backend::Silent(n) => n,
        }
    }
}

impl NoteSink for Backend {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.inner_mut().note_on(note, velocity)
    }

    fn note_off(&mut self, note: u8) -> Result<(), SinkError> {
        self.inner_mut().note_off(note)
    }

    fn all_notes_off(&mut self) -> Result<(), SinkError> {
        self.inner_mut().all_notes_off()
    }

    fn is_ready(&self) -> bool {
        self.inner().is_ready()
    }

    fn failure(&self) -> Option<String> {
        match self {
            Backend::Silent(_) => Some("no audio output device".to_string()),
            _ => self.inner().failure(),
        }
    }

    fn restart(&mut self) -> Result<(), SinkError> {
        self.inner_mut().restart()
    }
}
