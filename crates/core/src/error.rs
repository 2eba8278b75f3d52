//! Domain and storage error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure reported by a storage collaborator.
///
/// The engine has no recovery strategy of its own for these; they are carried
/// upward unchanged inside [`DomainError::Dependency`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but refused the operation (constraint, write failure).
    #[error("storage rejected operation: {0}")]
    Rejected(String),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Domain-level error.
///
/// Per-evaluator dispatch failures are not represented here; the alerts crate
/// aggregates those separately so one failing rule never masks the others.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested location, item, alert or supplier does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored configuration makes the request meaningless (zero capacity, depth limit).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A structural invariant was violated (e.g. a location under two parents).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The storage collaborator failed.
    #[error(transparent)]
    Dependency(#[from] StorageError),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_converts_into_dependency_unchanged() {
        let err: DomainError = StorageError::unavailable("connection refused").into();
        assert_eq!(
            err,
            DomainError::Dependency(StorageError::Unavailable("connection refused".to_string()))
        );
        assert_eq!(err.to_string(), "storage unavailable: connection refused");
    }

    #[test]
    fn configuration_error_message_is_readable() {
        let err = DomainError::configuration("location 7 has zero capacity");
        assert_eq!(err.to_string(), "configuration error: location 7 has zero capacity");
    }
}
