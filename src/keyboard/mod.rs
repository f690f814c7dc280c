//! Keyboard module
//!
//! Press-state tracking, scroll mapping, computer-keyboard input and the
//! session that ties them to a sound backend.

pub mod press_state;
pub mod qwerty;
pub mod scroll;
pub mod session;

pub use press_state::PressState;
pub use qwerty::{input_key, input_offset};
pub use scroll::{anchor_key, key_for_position, middle_anchor_key, position_for_key};
pub use session::{KeyboardSession, PressOutcome, ReleaseOutcome};
