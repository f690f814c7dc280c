//! Keyboard session
//!
//! The single owner of all mutable keyboard state: the key set, pressed keys,
//! current octave, sustain flag and scroll position. The presentation layer
//! holds one session and routes every gesture through it; the session decides
//! which note events reach the sound backend.

use std::ops::RangeInclusive;

use super::press_state::PressState;
use super::scroll;
use crate::config::KeyboardConfig;
use crate::engine::{AudioStatus, Dispatch, NoteSink, ReadinessPolicy, SinkGate};
use crate::error::{KeyboardError, Result};
use crate::keys::{Key, KeySet};

/// What happened to a press event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// The key went down; carries what happened to its note-on.
    Pressed(Dispatch),
    /// The key was already down; nothing was sent.
    AlreadyPressed,
    /// The backend is not ready and input is gated; nothing changed.
    Ignored,
}

/// What happened to a release event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A note-off was sent (or dropped by the readiness gate).
    Stopped(Dispatch),
    /// Sustain is on; the note keeps sounding.
    Sustained,
}

/// An interactive keyboard bound to a sound backend.
///
/// Sustain policy: while sustain is on, releases send no note-off. Turning
/// sustain off does not stop the notes it held; they end on the next octave
/// change or [`KeyboardSession::all_notes_off`].
pub struct KeyboardSession<S: NoteSink> {
    config: KeyboardConfig,
    keys: KeySet,
    naturals: Vec<Key>,
    accidentals: Vec<Key>,
    pressed: PressState,
    gate: SinkGate<S>,
    current_octave: i32,
    sustain: bool,
    scroll_position: f64,
}

impl<S: NoteSink> KeyboardSession<S> {
    /// Create a session for `config`, generating its keys.
    ///
    /// An initial octave outside the range falls back to the lowest octave.
    pub fn new(config: KeyboardConfig, sink: S) -> Result<Self> {
        let keys = KeySet::generate(config.start_octave, config.end_octave)?;
        let naturals = keys.natural_keys();
        let accidentals = keys.accidental_keys();
        let current_octave = if keys.octaves().contains(&config.initial_octave) {
            config.initial_octave
        } else {
            keys.start_octave()
        };

        let mut session = Self {
            config,
            keys,
            naturals,
            accidentals,
            pressed: PressState::new(),
            gate: SinkGate::new(sink),
            current_octave,
            sustain: false,
            scroll_position: scroll::MIDDLE_POSITION,
        };
        session.scroll_to_middle();
        Ok(session)
    }

    /// Session over an explicit octave range with default settings.
    pub fn with_range(start_octave: i32, end_octave: i32, sink: S) -> Result<Self> {
        Self::new(KeyboardConfig::with_range(start_octave, end_octave), sink)
    }

    // ---- Press / release ----

    /// A gesture started on `key`.
    pub fn on_press(&mut self, key: &Key) -> Result<PressOutcome> {
        let key = self.resolve(key)?;
        if self.pressed.is_pressed(&key) {
            return Ok(PressOutcome::AlreadyPressed);
        }
        if self.config.readiness == ReadinessPolicy::GateInput && !self.gate.is_open() {
            log::debug!("Ignoring {} until the sound backend is ready", key);
            return Ok(PressOutcome::Ignored);
        }

        self.pressed.press(key);
        let note = key.midi_note();
        let velocity = self.config.note_velocity();
        let dispatch = self.gate.dispatch(|sink| sink.note_on(note, velocity));
        log::debug!("Key down {} (note {}, {:?})", key, note, dispatch);
        Ok(PressOutcome::Pressed(dispatch))
    }

    /// A gesture ended on `key`.
    pub fn on_release(&mut self, key: &Key) -> Result<ReleaseOutcome> {
        let key = self.resolve(key)?;
        self.pressed.release(&key);

        if self.sustain {
            log::debug!("Key up {} (sustained)", key);
            return Ok(ReleaseOutcome::Sustained);
        }

        let note = key.midi_note();
        let dispatch = self.gate.dispatch(|sink| sink.note_off(note));
        log::debug!("Key up {} (note {}, {:?})", key, note, dispatch);
        Ok(ReleaseOutcome::Stopped(dispatch))
    }

    pub fn is_pressed(&self, key: &Key) -> bool {
        self.pressed.is_pressed(key)
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.count()
    }

    /// Held keys, for highlight rendering.
    pub fn pressed(&self) -> &PressState {
        &self.pressed
    }

    /// Stop every note, sustained ones included, and release all keys.
    pub fn all_notes_off(&mut self) -> Dispatch {
        self.pressed.clear();
        self.gate.dispatch(|sink| sink.all_notes_off())
    }

    // ---- Sustain ----

    pub fn sustain(&self) -> bool {
        self.sustain
    }

    /// Flip the sustain flag. Sends nothing.
    pub fn set_sustain(&mut self, on: bool) {
        self.sustain = on;
    }

    // ---- Octaves ----

    pub fn current_octave(&self) -> i32 {
        self.current_octave
    }

    pub fn octaves(&self) -> RangeInclusive<i32> {
        self.keys.octaves()
    }

    /// Switch the current octave, silencing everything.
    ///
    /// Returns false and changes nothing when `octave` is outside the range.
    pub fn on_octave_change(&mut self, octave: i32) -> bool {
        if !self.keys.octaves().contains(&octave) {
            log::debug!(
                "Octave {} outside {}-{}, ignored",
                octave,
                self.keys.start_octave(),
                self.keys.end_octave()
            );
            return false;
        }

        self.current_octave = octave;
        self.gate.dispatch(|sink| sink.all_notes_off());
        self.pressed.clear();
        log::info!("Octave changed to {}", octave);
        true
    }

    /// Move up one octave if possible.
    pub fn increase_octave(&mut self) -> bool {
        self.on_octave_change(self.current_octave + 1)
    }

    /// Move down one octave if possible.
    pub fn decrease_octave(&mut self) -> bool {
        self.on_octave_change(self.current_octave - 1)
    }

    // ---- Keys for rendering ----

    pub fn key_set(&self) -> &KeySet {
        &self.keys
    }

    /// White keys of the whole range, in playing order.
    pub fn natural_keys(&self) -> &[Key] {
        &self.naturals
    }

    /// Black keys of the whole range, in playing order.
    pub fn accidental_keys(&self) -> &[Key] {
        &self.accidentals
    }

    /// All twelve keys of the current octave.
    pub fn current_octave_keys(&self) -> &[Key] {
        self.keys.octave_keys(self.current_octave)
    }

    /// The black key overlaid on a white key, see [`KeySet::next_accidental`].
    pub fn next_accidental(&self, natural: &Key) -> Result<Option<Key>> {
        self.keys.next_accidental(natural)
    }

    // ---- Scrolling ----

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Set the scroll position, clamped to [0, 1]. NaN is ignored.
    pub fn set_scroll_position(&mut self, position: f64) {
        if !position.is_nan() {
            self.scroll_position = position.clamp(0.0, 1.0);
        }
    }

    /// Natural key nearest to the current scroll position.
    pub fn key_at_scroll_position(&self) -> Option<Key> {
        self.key_for_position(self.scroll_position).ok()
    }

    pub fn key_for_position(&self, position: f64) -> Result<Key> {
        scroll::key_for_position(position, &self.naturals)
    }

    pub fn position_for_key(&self, key: &Key) -> Result<f64> {
        scroll::position_for_key(key, &self.naturals)
    }

    pub fn anchor_key(&self, octave: i32) -> Option<Key> {
        scroll::anchor_key(octave, &self.naturals)
    }

    /// Scroll so that `key` is the key at the scroll position.
    pub fn scroll_to_key(&mut self, key: &Key) -> Result<f64> {
        let position = self.position_for_key(key)?;
        self.scroll_position = position;
        Ok(position)
    }

    /// Jump to the first white key of `octave` and make it the current octave.
    ///
    /// Returns the anchor key, or `None` (and changes nothing) when the octave
    /// is outside the range.
    pub fn scroll_to_octave(&mut self, octave: i32) -> Option<Key> {
        let anchor = self.anchor_key(octave)?;
        self.scroll_to_key(&anchor).ok()?;
        self.on_octave_change(octave);
        Some(anchor)
    }

    /// Step the current octave by `delta` and scroll to it.
    ///
    /// Returns `None` and changes nothing when the target is outside the range.
    pub fn step_octave(&mut self, delta: i32) -> Option<Key> {
        self.scroll_to_octave(self.current_octave.saturating_add(delta))
    }

    /// Scroll to the centre of the keyboard.
    pub fn scroll_to_middle(&mut self) -> Option<Key> {
        let middle = scroll::middle_anchor_key(&self.naturals)?;
        self.scroll_to_key(&middle).ok()?;
        Some(middle)
    }

    // ---- Sound backend ----

    /// Current backend status, polled.
    pub fn audio_status(&mut self) -> &AudioStatus {
        self.gate.refresh()
    }

    /// Restart a failed backend.
    pub fn retry_audio(&mut self) -> &AudioStatus {
        self.gate.retry()
    }

    pub fn sink(&self) -> &S {
        self.gate.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.gate.sink_mut()
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// The session's own copy of `key`, or an error if it is not in the range.
    fn resolve(&self, key: &Key) -> Result<Key> {
        self.keys.find(key.note, key.octave).ok_or_else(|| {
            KeyboardError::InvalidArgument(format!(
                "{} is outside octaves {}-{}",
                key,
                self.keys.start_octave(),
                self.keys.end_octave()
            ))
        })
    }
}
