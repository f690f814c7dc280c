//! Virtual Piano Library
//!
//! A scrollable multi-octave piano keyboard: key generation, press and scroll
//! state, sound backends and the egui front end.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod keyboard;
pub mod keys;
pub mod widgets;
