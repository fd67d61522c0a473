//! Error types for homeledger-core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input failed validation before any write
    ValidationError,
    /// Requester is not allowed to see the document
    Unauthorized,
    /// A referenced document does not exist
    NotFound,
    /// The document store failed to read or write
    StoreError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
        }
    }
}

/// Main error type for homeledger-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Wallet not found: {id}")]
    WalletNotFound { id: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("Goal not found: {id}")]
    GoalNotFound { id: String },

    #[error("Goal item not found: {id}")]
    GoalItemNotFound { id: String },

    #[error("Routine not found: {id}")]
    RoutineNotFound { id: String },

    #[error("Debt not found: {id}")]
    DebtNotFound { id: String },

    #[error("Budget not found for {member} in {period}")]
    BudgetNotFound { member: String, period: String },

    #[error("Store error: {message}")]
    StoreError { message: String },
}

impl CoreError {
    /// Convenience constructor for validation failures
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::WalletNotFound { .. }
            | CoreError::TransactionNotFound { .. }
            | CoreError::CategoryNotFound { .. }
            | CoreError::GoalNotFound { .. }
            | CoreError::GoalItemNotFound { .. }
            | CoreError::RoutineNotFound { .. }
            | CoreError::DebtNotFound { .. }
            | CoreError::BudgetNotFound { .. } => ErrorCode::NotFound,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::StoreError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::StoreError {
            message: err.to_string(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
