#![forbid(unsafe_code)]

//! Caller-error reporting.
//!
//! Interactive paths never fail: invalid interaction degrades to a no-op.
//! Only misuse of the API surface returns a [`PickerError`].

use std::fmt;

/// Errors raised for caller mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// A controlled value was supplied to a picker created uncontrolled.
    ModeSwitch,
    /// A record could not be imported as an item.
    InvalidRecord {
        /// Position of the record within its array.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeSwitch => f.write_str(
                "picker value mode cannot change after construction (uncontrolled picker received a controlled value)",
            ),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid record at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for PickerError {}

/// Standard result type for picker APIs.
pub type Result<T> = std::result::Result<T, PickerError>;
