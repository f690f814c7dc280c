//! Note sink
//!
//! The narrow interface between the keyboard and whatever produces sound, plus
//! the readiness gate every call from the keyboard goes through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a sound backend may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The backend has not finished starting up.
    #[error("sound backend is not ready")]
    NotReady,
    /// The backend failed while handling a message.
    #[error("sound backend error: {0}")]
    Backend(String),
}

/// A sound-producing backend driven by note events.
///
/// Implementations own their threads and devices; the keyboard only ever calls
/// these methods from its own control flow.
pub trait NoteSink {
    /// Start a note. `note` and `velocity` are in 0-127.
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), SinkError>;

    /// Stop a note.
    fn note_off(&mut self, note: u8) -> Result<(), SinkError>;

    /// Stop every sounding note, sustained ones included.
    fn all_notes_off(&mut self) -> Result<(), SinkError>;

    /// Whether the backend can accept notes right now.
    fn is_ready(&self) -> bool;

    /// Why the backend cannot become ready without a restart, if it can't.
    /// A backend that is merely still starting returns `None`.
    fn failure(&self) -> Option<String> {
        None
    }

    /// Try to bring a failed backend back up.
    fn restart(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A backend that never makes sound and never becomes ready.
#[derive(Debug, Default)]
pub struct NullSink;

impl NoteSink for NullSink {
    fn note_on(&mut self, _note: u8, _velocity: u8) -> Result<(), SinkError> {
        Ok(())
    }

    fn note_off(&mut self, _note: u8) -> Result<(), SinkError> {
        Ok(())
    }

    fn all_notes_off(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        false
    }
}

/// What the keyboard does with input while the backend is not ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessPolicy {
    /// Keys still light up; the sound is dropped.
    #[default]
    DropAudio,
    /// Presses are ignored until the backend is ready.
    GateInput,
}

/// Backend status shown by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioStatus {
    /// Backend still starting.
    Loading,
    /// Backend accepting notes.
    Ready,
    /// Backend failed; the keyboard keeps working silently.
    Unavailable(String),
}

impl AudioStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AudioStatus::Ready)
    }
}

/// Result of handing one message to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The backend accepted the message.
    Sent,
    /// The backend was not ready; the message was dropped.
    Dropped,
    /// The backend reported an error; the message was dropped.
    Failed,
}

/// Readiness gate around a [`NoteSink`].
///
/// Every message passes through [`SinkGate::dispatch`], which drops it while
/// the backend is not ready and turns backend errors into an
/// [`AudioStatus::Unavailable`] instead of propagating them.
pub struct SinkGate<S: NoteSink> {
    sink: S,
    status: AudioStatus,
}

impl<S: NoteSink> SinkGate<S> {
    pub fn new(sink: S) -> Self {
        let mut gate = Self {
            sink,
            status: AudioStatus::Loading,
        };
        gate.refresh();
        gate
    }

    /// Current backend status.
    pub fn status(&self) -> &AudioStatus {
        &self.status
    }

    /// True when messages will reach the backend.
    pub fn is_open(&mut self) -> bool {
        self.refresh().is_ready()
    }

    /// Poll the backend's readiness. A reported failure sticks until
    /// [`SinkGate::retry`].
    pub fn refresh(&mut self) -> &AudioStatus {
        if !matches!(self.status, AudioStatus::Unavailable(_)) {
            let next = if self.sink.is_ready() {
                AudioStatus::Ready
            } else if let Some(reason) = self.sink.failure() {
                AudioStatus::Unavailable(reason)
            } else {
                AudioStatus::Loading
            };
            if next != self.status {
                log::info!("Sound backend status: {:?}", next);
                self.status = next;
            }
        }
        &self.status
    }

    /// Restart the backend and clear a previous failure.
    pub fn retry(&mut self) -> &AudioStatus {
        match self.sink.restart() {
            Ok(()) => {
                self.status = AudioStatus::Loading;
                self.refresh();
            }
            Err(e) => self.fail(e),
        }
        &self.status
    }

    /// Send one message if the backend is ready.
    pub fn dispatch<F>(&mut self, send: F) -> Dispatch
    where
        F: FnOnce(&mut S) -> Result<(), SinkError>,
    {
        if !self.is_open() {
            return Dispatch::Dropped;
        }
        match send(&mut self.sink) {
            Ok(()) => Dispatch::Sent,
            Err(SinkError::NotReady) => {
                self.status = AudioStatus::Loading;
                Dispatch::Dropped
            }
            Err(e) => {
                self.fail(e);
                Dispatch::Failed
            }
        }
    }

    fn fail(&mut self, err: SinkError) {
        log::warn!("Sound backend unavailable: {}", err);
        self.status = AudioStatus::Unavailable(err.to_string());
    }

    /// The wrapped backend.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Messages seen by [`RecordingSink`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Recorded {
        NoteOn(u8, u8),
        NoteOff(u8),
        AllNotesOff,
    }

    /// Test double that records every accepted message.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub ready: bool,
        pub fail_with: Option<String>,
        pub down: Option<String>,
        pub restarts: usize,
        pub messages: Vec<Recorded>,
    }

    impl RecordingSink {
        pub fn ready() -> Self {
            Self {
                ready: true,
                ..Default::default()
            }
        }

        pub fn count(&self, message: Recorded) -> usize {
            self.messages.iter().filter(|m| **m == message).count()
        }

        pub fn note_offs(&self) -> usize {
            self.messages
                .iter()
                .filter(|m| matches!(m, Recorded::NoteOff(_)))
                .count()
        }

        fn record(&mut self, message: Recorded) -> Result<(), SinkError> {
            if let Some(reason) = &self.fail_with {
                return Err(SinkError::Backend(reason.clone()));
            }
            self.messages.push(message);
            Ok(())
        }
    }

    impl NoteSink for RecordingSink {
        fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), SinkError> {
            self.record(Recorded::NoteOn(note, velocity))
        }

        fn note_off(&mut self, note: u8) -> Result<(), SinkError> {
            self.record(Recorded::NoteOff(note))
        }

        fn all_notes_off(&mut self) -> Result<(), SinkError> {
            self.record(Recorded::AllNotesOff)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn failure(&self) -> Option<String> {
            self.down.clone()
        }

        fn restart(&mut self) -> Result<(), SinkError> {
            self.restarts += 1;
            self.fail_with = None;
            if self.down.take().is_some() {
                self.ready = true;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Recorded, RecordingSink};
    use super::*;

    #[test]
    fn test_gate_drops_until_ready() {
        let mut gate = SinkGate::new(RecordingSink::default());
        assert_eq!(gate.status(), &AudioStatus::Loading);
        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Dropped);
        assert!(gate.sink().messages.is_empty());

        gate.sink_mut().ready = true;
        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Sent);
        assert_eq!(gate.status(), &AudioStatus::Ready);
        assert_eq!(gate.sink().messages, vec![Recorded::NoteOn(60, 100)]);
    }

    #[test]
    fn test_gate_reports_backend_failure() {
        let mut sink = RecordingSink::ready();
        sink.fail_with = Some("soundfont missing".to_string());
        let mut gate = SinkGate::new(sink);

        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Failed);
        assert_eq!(
            gate.status(),
            &AudioStatus::Unavailable("sound backend error: soundfont missing".to_string())
        );

        // Failure sticks even though the sink still claims readiness
        assert_eq!(gate.dispatch(|s| s.note_off(60)), Dispatch::Dropped);
    }

    #[test]
    fn test_gate_retry() {
        let mut sink = RecordingSink::ready();
        sink.fail_with = Some("device lost".to_string());
        let mut gate = SinkGate::new(sink);
        gate.dispatch(|s| s.all_notes_off());
        assert!(!gate.status().is_ready());

        assert_eq!(gate.retry(), &AudioStatus::Ready);
        assert_eq!(gate.sink().restarts, 1);
        assert_eq!(gate.dispatch(|s| s.all_notes_off()), Dispatch::Sent);
    }

    #[test]
    fn test_gate_reports_startup_failure() {
        let sink = RecordingSink {
            down: Some("no output device".to_string()),
            ..Default::default()
        };
        let mut gate = SinkGate::new(sink);
        assert_eq!(
            gate.status(),
            &AudioStatus::Unavailable("no output device".to_string())
        );
        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Dropped);

        assert_eq!(gate.retry(), &AudioStatus::Ready);
        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Sent);
    }

    #[test]
    fn test_null_sink_never_ready() {
        let mut gate = SinkGate::new(NullSink);
        assert_eq!(gate.dispatch(|s| s.note_on(60, 100)), Dispatch::Dropped);
        assert_eq!(gate.status(), &AudioStatus::Loading);
    }

    #[test]
    fn test_readiness_policy_serde() {
        let json = serde_json::to_string(&ReadinessPolicy::GateInput).unwrap();
        assert_eq!(json, "\"gate_input\"");
        let policy: ReadinessPolicy = serde_json::from_str("\"drop_audio\"").unwrap();
        assert_eq!(policy, ReadinessPolicy::DropAudio);
    }
}
