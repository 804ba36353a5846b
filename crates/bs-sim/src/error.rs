//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or propagating the plant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Out-of-domain physical parameter, raised at construction time.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// Misuse of a runtime operation (bad interval, non-finite reset state).
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The input voltage source produced a non-finite value.
    #[error("Input voltage evaluated to {value} at t={t} s")]
    ModelEvaluation { t: f64, value: f64 },

    /// Integration produced a non-finite state.
    #[error("Integration diverged between t={t0} s and t={t1} s")]
    Diverged { t0: f64, t1: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<bs_core::CoreError> for SimError {
    fn from(e: bs_core::CoreError) -> Self {
        match e {
            bs_core::CoreError::NonFinite { what, .. }
            | bs_core::CoreError::OutOfRange { what, .. }
            | bs_core::CoreError::InvalidArg { what } => SimError::InvalidParameter { what },
        }
    }
}
