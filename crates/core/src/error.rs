//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The variants form the failure taxonomy of a single note operation, in the
/// order the failure can occur: before the store (`Validation`, `InvalidId`),
/// at the store (`NotFound`, `Store`), and after a successful commit
/// (`Publish`). A `Publish` error means the mutation is durable but the
/// downstream notification was not delivered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested note was not found within the tenant.
    #[error("not found")]
    NotFound,

    /// The backing store rejected or failed the mutation.
    #[error("store failure: {0}")]
    Store(String),

    /// Publication to the bus failed after a successful commit.
    #[error("publish failure: {0}")]
    Publish(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }
}
