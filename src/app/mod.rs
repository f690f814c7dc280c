//! Application module
//!
//! Contains the main egui application and theme definitions.

pub mod piano_app;
pub mod theme;

pub use piano_app::PianoApp;
