use crate::trajectory::{FloatValue, Time};
use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum SOCMError {
    /// A required named parameter is absent from the supplied parameter set.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),
    /// A parameter value failed construction-time validation.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
    /// A parameter table could not be deserialized.
    #[error("failed to parse parameter table: {0}")]
    Parse(String),
    /// The transfer/decay linear system is not invertible.
    #[error("singular pool system: {0}")]
    SingularSystem(String),
    /// The computed derivatives failed the mass-balance self-check.
    #[error(
        "mass conservation violated at t={time}: total derivative {actual} \
         vs input {expected} (relative error {relative_error:e})"
    )]
    ConservationViolation {
        time: Time,
        expected: FloatValue,
        actual: FloatValue,
        relative_error: FloatValue,
    },
    /// The ODE solver failed to complete an integration.
    #[error("integration failed: {0}")]
    Integration(String),
}

/// Convenience type for `Result<T, SOCMError>`.
pub type SOCMResult<T> = Result<T, SOCMError>;
