//! Keyboard errors
//!
//! Precondition failures raised by the key model, scroll mapping and session.
//! None of these are user-facing: a caller that receives one should ignore the
//! request that caused it and leave the keyboard as it was.

use thiserror::Error;

/// Errors reported by the key model and the keyboard session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyboardError {
    /// Octave range with the start above the end.
    #[error("invalid octave range: start {start} is above end {end}")]
    InvalidRange {
        /// Requested first octave.
        start: i32,
        /// Requested last octave.
        end: i32,
    },

    /// A key that does not satisfy the operation's precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Scroll mapping against an empty key sequence.
    #[error("key collection is empty")]
    EmptyKeyset,

    /// Scroll mapping for a key missing from the natural sequence.
    #[error("key {0} is not in the natural key sequence")]
    KeyNotFound(String),
}

/// Result alias for keyboard operations.
pub type Result<T> = std::result::Result<T, KeyboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyboardError::InvalidRange { start: 5, end: 2 };
        assert_eq!(err.to_string(), "invalid octave range: start 5 is above end 2");

        let err = KeyboardError::KeyNotFound("C#4".to_string());
        assert!(err.to_string().contains("C#4"));

        assert_eq!(KeyboardError::EmptyKeyset.to_string(), "key collection is empty");
    }
}
