//! MIDI output backend
//!
//! Sends the keyboard's notes to a hardware or virtual MIDI output port using
//! midir, so an external synth or DAW does the sound.

use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;

use super::messages::NoteMessage;
use super::sink::{NoteSink, SinkError};

/// Client name registered with the MIDI subsystem.
const CLIENT_NAME: &str = "Virtual Piano";

/// Information about a MIDI output device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiDeviceInfo {
    /// Human-readable device name.
    pub name: String,
    /// Internal port index.
    pub index: usize,
}

/// Error type for MIDI operations.
#[derive(Debug, Clone, Error)]
pub enum MidiError {
    /// Failed to initialize MIDI subsystem.
    #[error("MIDI init error: {0}")]
    Init(String),
    /// Failed to connect to device.
    #[error("MIDI connection error: {0}")]
    Connection(String),
    /// Device not found.
    #[error("MIDI device not found")]
    DeviceNotFound,
    /// No MIDI devices available.
    #[error("No MIDI output devices available")]
    NoDevices,
}

/// A [`NoteSink`] writing to a MIDI output port.
///
/// Ready while connected. Messages go out on the configured channel.
pub struct MidiOutSink {
    /// Cached device list.
    devices: Vec<MidiDeviceInfo>,
    /// Currently selected device index (None = no device).
    selected_device: Option<usize>,
    /// Active MIDI connection.
    connection: Option<MidiOutputConnection>,
    /// MIDI channel (0-15).
    channel: u8,
}

impl MidiOutSink {
    /// Create a disconnected sink sending on `channel`.
    pub fn new(channel: u8) -> Self {
        Self {
            devices: Vec::new(),
            selected_device: None,
            connection: None,
            channel: channel & 0x0F,
        }
    }

    /// Enumerate available MIDI output devices.
    pub fn enumerate_devices(&mut self) -> Result<Vec<MidiDeviceInfo>, MidiError> {
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| MidiError::Init(e.to_string()))?;

        self.devices = midi_out
            .ports()
            .iter()
            .enumerate()
            .map(|(index, port)| MidiDeviceInfo {
                name: midi_out
                    .port_name(port)
                    .unwrap_or_else(|_| "Unknown".to_string()),
                index,
            })
            .collect();
        Ok(self.devices.clone())
    }

    /// Get the currently cached device list without rescanning.
    pub fn devices(&self) -> &[MidiDeviceInfo] {
        &self.devices
    }

    pub fn selected_device(&self) -> Option<usize> {
        self.selected_device
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Connect to a MIDI output device by index.
    pub fn connect(&mut self, device_index: usize) -> Result<(), MidiError> {
        self.disconnect();

        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| MidiError::Init(e.to_string()))?;
        let ports = midi_out.ports();
        let port = ports.get(device_index).ok_or(MidiError::DeviceNotFound)?;
        let name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_out
            .connect(port, "Virtual Piano Output")
            .map_err(|e| MidiError::Connection(e.to_string()))?;

        self.connection = Some(connection);
        self.selected_device = Some(device_index);
        log::info!("MIDI output connected to device {}: {}", device_index, name);
        Ok(())
    }

    /// Connect to the first available output device.
    pub fn connect_first(&mut self) -> Result<(), MidiError> {
        if self.enumerate_devices()?.is_empty() {
            return Err(MidiError::NoDevices);
        }
        self.connect(0)
    }

    /// Disconnect from the current MIDI device, silencing it first.
    pub fn disconnect(&mut self) {
        if self.connection.is_some() {
            let _ = self.send(NoteMessage::AllNotesOff);
        }
        if let Some(connection) = self.connection.take() {
            connection.close();
            self.selected_device = None;
            log::info!("MIDI output disconnected");
        }
    }

    /// Check if currently connected to a device.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn send(&mut self, message: NoteMessage) -> Result<(), SinkError> {
        let connection = self.connection.as_mut().ok_or(SinkError::NotReady)?;
        connection
            .send(&message.to_bytes(self.channel))
            .map_err(|e| SinkError::Backend(e.to_string()))
    }
}

impl NoteSink for MidiOutSink {
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
        self.is_connected()
    }

    fn failure(&self) -> Option<String> {
        (!self.is_connected()).then(|| "no MIDI output connected".to_string())
    }

    /// Reconnect to the previously selected device, or the first one.
    fn restart(&mut self) -> Result<(), SinkError> {
        let result = match self.selected_device {
            Some(index) => self.connect(index),
            None => self.connect_first(),
        };
        result.map_err(|e| SinkError::Backend(e.to_string()))
    }
}

impl Drop for MidiOutSink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_error_display() {
        assert_eq!(MidiError::DeviceNotFound.to_string(), "MIDI device not found");
        let err = MidiError::Connection("port busy".to_string());
        assert!(err.to_string().contains("port busy"));
    }

    #[test]
    fn test_disconnected_sink_is_not_ready() {
        let mut sink = MidiOutSink::new(3);
        assert!(!sink.is_ready());
        assert_eq!(sink.selected_device(), None);
        assert_eq!(sink.note_on(60, 100), Err(SinkError::NotReady));
        assert_eq!(sink.note_off(60), Err(SinkError::NotReady));
        assert_eq!(sink.all_notes_off(), Err(SinkError::NotReady));
        assert!(sink.failure().is_some());
    }

    #[test]
    fn test_channel_is_masked() {
        assert_eq!(MidiOutSink::new(0x1A).channel(), 0x0A);
    }

    // Connecting needs a MIDI subsystem with at least one output port, which
    // CI machines usually lack.
}
