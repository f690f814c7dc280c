//! Scroll position mapping.
//!
//! A normalized scroll position in [0, 1] spans the natural (white) key
//! sequence from its first to its last key. The two directions of the mapping
//! are inverse up to quantization, so programmatic scrolling (octave buttons)
//! and drag scrolling land on the same keys and never chase each other.

use crate::error::{KeyboardError, Result};
use crate::keys::Key;

/// Position of the keyboard centre, used for the initial view.
pub const MIDDLE_POSITION: f64 = 0.5;

/// Nearest natural key to a normalized position.
///
/// The position is clamped to [0, 1]; NaN maps to the first key.
pub fn key_for_position(position: f64, naturals: &[Key]) -> Result<Key> {
    if naturals.is_empty() {
        return Err(KeyboardError::EmptyKeyset);
    }

    let position = if position.is_nan() { 0.0 } else { position.clamp(0.0, 1.0) };
    let last = (naturals.len() - 1) as f64;
    let index = (position * last).round() as usize;
    Ok(naturals[index.min(naturals.len() - 1)])
}

/// Normalized position of a natural key.
///
/// Fails when `key` is not in the sequence, for instance an accidental.
pub fn position_for_key(key: &Key, naturals: &[Key]) -> Result<f64> {
    let index = naturals
        .iter()
        .position(|k| k == key)
        .ok_or_else(|| KeyboardError::KeyNotFound(key.display_name()))?;

    let span = naturals.len().saturating_sub(1).max(1) as f64;
    Ok(index as f64 / span)
}

/// First natural key of `octave`, the target of an octave jump.
pub fn anchor_key(octave: i32, naturals: &[Key]) -> Option<Key> {
    naturals.iter().find(|k| k.octave == octave).copied()
}

/// Natural key at the centre of the keyboard.
pub fn middle_anchor_key(naturals: &[Key]) -> Option<Key> {
    key_for_position(MIDDLE_POSITION, naturals).ok()
}
