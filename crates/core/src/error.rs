//! Engine error types.

use pennyplan_shared::AppError;
use thiserror::Error;

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the planning engine.
///
/// Every variant is detected before any result is produced; the engine
/// never returns a partially computed value alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Non-positive duration, negative amount, or malformed parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The plan type is not one of `savings`, `investment`, `hybrid`.
    #[error("Unknown plan type: {0}")]
    UnknownPlanType(String),

    /// The allocation strategy failed or returned an invariant-violating result.
    #[error("Allocation unavailable: {0}")]
    AllocationUnavailable(String),
}

impl EngineError {
    /// An amount that no longer fits in `i64` minor units.
    pub(crate) fn overflow(what: &str) -> Self {
        Self::InvalidInput(format!("amount overflow in {what}"))
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput(_) | EngineError::UnknownPlanType(_) => {
                Self::Validation(err.to_string())
            }
            EngineError::AllocationUnavailable(_) => Self::ExternalService(err.to_string()),
        }
    }
}
