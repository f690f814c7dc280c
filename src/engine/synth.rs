//! Built-in synth backend
//!
//! A small sine-voice synth on the default cpal output device, so the keyboard
//! makes sound without external gear. Notes reach the audio callback through an
//! rtrb ring buffer; the callback must stay real-time safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;

use super::messages::NoteMessage;
use super::sink::{NoteSink, SinkError};

/// Number of simultaneously sounding notes.
pub const MAX_VOICES: usize = 16;

/// Capacity of the note queue (UI -> audio callback).
pub const NOTE_QUEUE_SIZE: usize = 256;

const ATTACK_SECONDS: f32 = 0.005;
const RELEASE_SECONDS: f32 = 0.25;
const MASTER_GAIN: f32 = 0.2;

/// Errors that can occur during audio engine operation.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    /// No audio output device was found.
    #[error("No audio output device found")]
    NoOutputDevice,
    /// Failed to get device configuration.
    #[error("Failed to get device configuration: {0}")]
    ConfigurationFailed(String),
    /// Failed to create the audio stream.
    #[error("Failed to create audio stream: {0}")]
    StreamCreationFailed(String),
    /// Failed to start/stop playback.
    #[error("Failed to control audio playback: {0}")]
    StreamPlaybackFailed(String),
}

#[derive(Clone, Copy, Debug, Default)]
struct Voice {
    note: u8,
    phase: f32,
    increment: f32,
    amplitude: f32,
    level: f32,
    gate: bool,
}

impl Voice {
    fn is_silent(&self) -> bool {
        !self.gate && self.level <= 0.0
    }
}

/// Fixed pool of sine voices driven by [`NoteMessage`]s.
///
/// REAL-TIME SAFE: no allocations after construction.
pub struct VoiceBank {
    voices: [Voice; MAX_VOICES],
    attack_step: f32,
    release_step: f32,
    sample_rate: f32,
}

impl VoiceBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: [Voice::default(); MAX_VOICES],
            attack_step: 1.0 / (ATTACK_SECONDS * sample_rate),
            release_step: 1.0 / (RELEASE_SECONDS * sample_rate),
            sample_rate,
        }
    }

    /// Apply one note message.
    pub fn handle(&mut self, message: NoteMessage) {
        match message {
            NoteMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            NoteMessage::NoteOff { note } => {
                for voice in self.voices.iter_mut().filter(|v| v.gate && v.note == note) {
                    voice.gate = false;
                }
            }
            NoteMessage::AllNotesOff => {
                for voice in self.voices.iter_mut() {
                    voice.gate = false;
                }
            }
        }
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        // Retrigger a voice already on this note, else a free one, else the quietest
        let index = self
            .voices
            .iter()
            .position(|v| !v.is_silent() && v.note == note)
            .or_else(|| self.voices.iter().position(Voice::is_silent))
            .unwrap_or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.level.total_cmp(&b.1.level))
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            });

        let frequency = 440.0 * 2f32.powf((note as f32 - 69.0) / 12.0);
        let voice = &mut self.voices[index];
        voice.note = note;
        voice.increment = frequency / self.sample_rate;
        voice.amplitude = velocity as f32 / 127.0;
        voice.gate = true;
    }

    /// Render the next mono sample.
    pub fn next_sample(&mut self) -> f32 {
        let mut out = 0.0;
        for voice in self.voices.iter_mut() {
            if voice.is_silent() {
                continue;
            }
            if voice.gate {
                voice.level = (voice.level + self.attack_step).min(1.0);
            } else {
                voice.level = (voice.level - self.release_step).max(0.0);
            }

            out += (voice.phase * std::f32::consts::TAU).sin() * voice.amplitude * voice.level;

            voice.phase += voice.increment;
            if voice.phase >= 1.0 {
                voice.phase -= 1.0;
            }
        }
        out * MASTER_GAIN
    }

    /// Number of voices still producing sound.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_silent()).count()
    }
}

/// A [`NoteSink`] playing through the built-in sine synth.
///
/// Ready once the output stream is running and has not reported an error.
pub struct SynthSink {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    notes: Option<Producer<NoteMessage>>,
    stream_failed: Arc<AtomicBool>,
}

impl SynthSink {
    /// Create a synth on the default output device. Call `start()` to open
    /// the stream.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::ConfigurationFailed(e.to_string()))?;

        let config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: SampleRate(supported_config.sample_rate().0),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self {
            device,
            config,
            stream: None,
            notes: None,
            stream_failed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the name of the currently selected device.
    pub fn current_device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "Unknown".to_string())
    }

    /// Get the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of output channels.
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Open and start the output stream.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let (producer, mut consumer): (Producer<NoteMessage>, Consumer<NoteMessage>) =
            RingBuffer::new(NOTE_QUEUE_SIZE);
        let mut bank = VoiceBank::new(self.config.sample_rate.0 as f32);
        let channels = self.config.channels as usize;
        let failed = Arc::clone(&self.stream_failed);
        failed.store(false, Ordering::Relaxed);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // REAL-TIME SAFE: No allocations, no locks, no blocking
                    while let Ok(message) = consumer.pop() {
                        bank.handle(message);
                    }
                    for frame in data.chunks_mut(channels) {
                        let sample = bank.next_sample();
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                    failed.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| AudioError::StreamCreationFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;

        log::info!(
            "Synth started on {} ({}Hz, {}ch)",
            self.current_device_name(),
            self.sample_rate(),
            self.channels()
        );
        self.stream = Some(stream);
        self.notes = Some(producer);
        Ok(())
    }

    /// Stop the output stream.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        self.notes = None;
        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Check if the audio stream is currently running.
    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    fn send(&mut self, message: NoteMessage) -> Result<(), SinkError> {
        let notes = self.notes.as_mut().ok_or(SinkError::NotReady)?;
        notes
            .push(message)
            .map_err(|_| SinkError::Backend("note queue full".to_string()))
    }
}

impl NoteSink for SynthSink {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.send(NoteMessage::NoteOn { note, velocity })
    }

    fn note_off(&mut self, note: u8) -> Result<(), SinkError> {
        self.send(NoteMessage::NoteOff { note })
    }

    fn all_notes_off(&mut self) -> Result<(), SinkError> {
        self.send(NoteMessage::AllNotesOff)
    }

    fn is_ready(&self) -> bool {
        self.is_running() && !self.stream_failed.load(Ordering::Relaxed)
    }

    fn failure(&self) -> Option<String> {
        if self.stream_failed.load(Ordering::Relaxed) {
            Some("audio stream error".to_string())
        } else if !self.is_running() {
            Some("audio stream is not running".to_string())
        } else {
            None
        }
    }

    fn restart(&mut self) -> Result<(), SinkError> {
        self.stop().map_err(|e| SinkError::Backend(e.to_string()))?;
        self.start().map_err(|e| SinkError::Backend(e.to_string()))
    }
}
