//! Widgets module
//!
//! Custom UI controls for the piano interface.

pub mod piano;

pub use piano::{piano, KeyboardLayout, PianoConfig, PianoGesture};
