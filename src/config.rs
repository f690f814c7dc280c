//! Keyboard configuration.
//!
//! The octave range, starting octave and note dispatch settings, stored as
//! JSON. Display options (key width, labels) belong to the presentation layer
//! and are not part of this file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::ReadinessPolicy;
use crate::keys::Note;

/// Current config format version.
/// Increment this when making breaking changes to the format.
pub const CONFIG_VERSION: u32 = 1;

/// Velocity sent with every note-on unless configured otherwise.
pub const DEFAULT_VELOCITY: u8 = 100;

/// Keyboard session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Config format version for future compatibility.
    pub version: u32,
    /// Lowest generated octave.
    pub start_octave: i32,
    /// Highest generated octave.
    pub end_octave: i32,
    /// Octave selected when the session starts.
    pub initial_octave: i32,
    /// Note-on velocity (1-127).
    pub velocity: u8,
    /// MIDI channel used by MIDI backends (0-15).
    pub midi_channel: u8,
    /// Input handling while the sound backend is not ready.
    pub readiness: ReadinessPolicy,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            start_octave: 1,
            end_octave: 7,
            initial_octave: 4,
            velocity: DEFAULT_VELOCITY,
            midi_channel: 0,
            readiness: ReadinessPolicy::DropAudio,
        }
    }
}

impl KeyboardConfig {
    /// Config for an explicit octave range, starting on its lowest octave
    /// unless middle C is inside it.
    pub fn with_range(start_octave: i32, end_octave: i32) -> Self {
        let initial_octave = if (start_octave..=end_octave).contains(&4) {
            4
        } else {
            start_octave
        };
        Self {
            start_octave,
            end_octave,
            initial_octave,
            ..Default::default()
        }
    }

    /// Check if this config version is compatible with the current format.
    pub fn is_compatible(&self) -> bool {
        self.version <= CONFIG_VERSION
    }

    /// Reject settings the session cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_compatible() {
            return Err(ConfigError::IncompatibleVersion {
                found: self.version,
                expected: CONFIG_VERSION,
            });
        }
        if self.start_octave > self.end_octave {
            return Err(ConfigError::Invalid(format!(
                "start octave {} is above end octave {}",
                self.start_octave, self.end_octave
            )));
        }
        if !(self.start_octave..=self.end_octave).contains(&self.initial_octave) {
            return Err(ConfigError::Invalid(format!(
                "initial octave {} is outside {}-{}",
                self.initial_octave, self.start_octave, self.end_octave
            )));
        }
        let lowest = Note::C.midi_note(self.start_octave);
        let highest = Note::B.midi_note(self.end_octave);
        if lowest < 0 || highest > 127 {
            return Err(ConfigError::Invalid(format!(
                "octaves {}-{} span MIDI notes {}-{}, outside 0-127",
                self.start_octave, self.end_octave, lowest, highest
            )));
        }
        if self.midi_channel > 15 {
            return Err(ConfigError::Invalid(format!(
                "MIDI channel {} is above 15",
                self.midi_channel
            )));
        }
        Ok(())
    }

    /// Velocity limited to 1-127; a zero note-on would act as a note-off.
    pub fn note_velocity(&self) -> u8 {
        self.velocity.clamp(1, 127)
    }
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Config written by a newer version.
    #[error("incompatible config version: found {found}, expected <= {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },
    /// Settings that fail validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Save a config to a JSON file.
pub fn save_to_file(config: &KeyboardConfig, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load and validate a config from a JSON file.
pub fn load_from_file(path: &Path) -> Result<KeyboardConfig, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    let config: KeyboardConfig = serde_json::from_str(&json)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KeyboardConfig::default();
        assert_eq!(config.start_octave, 1);
        assert_eq!(config.end_octave, 7);
        assert_eq!(config.initial_octave, 4);
        assert_eq!(config.velocity, 100);
        assert_eq!(config.readiness, ReadinessPolicy::DropAudio);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_range() {
        assert_eq!(KeyboardConfig::with_range(2, 6).initial_octave, 4);
        assert_eq!(KeyboardConfig::with_range(5, 7).initial_octave, 5);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = KeyboardConfig {
            start_octave: 6,
            end_octave: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = KeyboardConfig {
            initial_octave: 9,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = KeyboardConfig {
            version: CONFIG_VERSION + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_midi_range() {
        let too_high = KeyboardConfig {
            end_octave: 9,
            ..Default::default()
        };
        assert!(matches!(too_high.validate(), Err(ConfigError::Invalid(_))));

        let too_low = KeyboardConfig {
            start_octave: -2,
            ..Default::default()
        };
        assert!(matches!(too_low.validate(), Err(ConfigError::Invalid(_))));

        // C-1 (0) to B8 (119) is the widest accepted range
        let widest = KeyboardConfig::with_range(-1, 8);
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_octaves_above_midi_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyboard.json");
        std::fs::write(
            &path,
            r#"{ "start_octave": 8, "end_octave": 10, "initial_octave": 9 }"#,
        )
        .unwrap();
        assert!(matches!(load_from_file(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_note_velocity_clamps() {
        let config = KeyboardConfig {
            velocity: 0,
            ..Default::default()
        };
        assert_eq!(config.note_velocity(), 1);

        let config = KeyboardConfig {
            velocity: 200,
            ..Default::default()
        };
        assert_eq!(config.note_velocity(), 127);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: KeyboardConfig =
            serde_json::from_str(r#"{ "start_octave": 2, "end_octave": 6 }"#).unwrap();
        assert_eq!(config.start_octave, 2);
        assert_eq!(config.initial_octave, 4);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyboard.json");

        let config = KeyboardConfig {
            readiness: ReadinessPolicy::GateInput,
            midi_channel: 9,
            ..KeyboardConfig::with_range(2, 6)
        };
        save_to_file(&config, &path).unwrap();
        assert_eq!(load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyboard.json");
        std::fs::write(&path, r#"{ "start_octave": 7, "end_octave": 1 }"#).unwrap();
        assert!(matches!(load_from_file(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(ConfigError::Serialization(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_from_file(&missing), Err(ConfigError::Io(_))));
    }
}
