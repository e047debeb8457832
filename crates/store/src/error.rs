//! Store error types.

use pennyplan_core::EngineError;
use pennyplan_shared::AppError;
use pennyplan_shared::types::{CategoryId, ExpenseId, ProjectId};
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Input rejected before it was written.
    #[error(transparent)]
    Validation(#[from] EngineError),

    /// Snapshot document could not be parsed or rendered.
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProjectNotFound(_)
            | StoreError::CategoryNotFound(_)
            | StoreError::ExpenseNotFound(_) => Self::NotFound(err.to_string()),
            StoreError::Validation(engine) => engine.into(),
            StoreError::Snapshot(_) => Self::Validation(err.to_string()),
        }
    }
}
