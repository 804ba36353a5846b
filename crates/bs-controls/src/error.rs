//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<bs_core::CoreError> for ControlError {
    fn from(e: bs_core::CoreError) -> Self {
        let what = match e {
            bs_core::CoreError::NonFinite { what, .. }
            | bs_core::CoreError::OutOfRange { what, .. }
            | bs_core::CoreError::InvalidArg { what } => what,
        };
        ControlError::InvalidArg { what }
    }
}
