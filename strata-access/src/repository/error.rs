//! Repository error types
//!
//! Structured errors raised at the store boundary. The orchestrator wraps
//! them into [`AccessError::Operation`](crate::error::AccessError) before
//! they cross the engine boundary, so callers never match on a backend's
//! native error type.

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Finding a single record by identifier
    FindById,
    /// Reading multiple records
    FindAll,
    /// Persisting one or more records
    Save,
    /// Deleting records
    Delete,
    /// Reading a page of records
    Page,
    /// Executing a translated predicate query
    Execute,
    /// Executing an aggregate plan
    Aggregate,
    /// Counting records
    Count,
    /// Checking record existence
    Exists,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Save => write!(f, "save"),
            Self::Delete => write!(f, "delete"),
            Self::Page => write!(f, "page"),
            Self::Execute => write!(f, "execute"),
            Self::Aggregate => write!(f, "aggregate"),
            Self::Count => write!(f, "count"),
            Self::Exists => write!(f, "exists"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Failed to reach the backing store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Store constraint violation (unique, foreign key, missing identifier)
    ConstraintViolation,
    /// Serialization or deserialization failure
    Serialization,
    /// The backend cannot execute the requested plan
    Unsupported,
    /// Underlying storage failure
    Storage,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::Serialization => write!(f, "serialization"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Storage => write!(f, "storage"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// # Example
///
/// ```rust
/// use strata_access::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
///
/// let error = RepositoryError::storage(RepositoryOperation::Save, "disk full")
///     .with_entity("Employee", "42");
/// assert_eq!(error.kind, RepositoryErrorKind::Storage);
/// assert!(error.to_string().contains("[Employee: 42]"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The identifier of the record involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a storage error
    pub fn storage(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Storage, message)
    }

    /// Create a constraint violation error
    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::FindById,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create an "unsupported plan" error
    pub fn unsupported(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Unsupported, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether the error is transient and may succeed on retry
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::FindById), "find_by_id");
        assert_eq!(format!("{}", RepositoryOperation::Execute), "execute");
        assert_eq!(format!("{}", RepositoryOperation::Aggregate), "aggregate");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(format!("{}", RepositoryErrorKind::Storage), "storage");
        assert_eq!(
            format!("{}", RepositoryErrorKind::ConstraintViolation),
            "constraint_violation"
        );
        assert_eq!(format!("{}", RepositoryErrorKind::Unsupported), "unsupported");
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::storage(RepositoryOperation::Save, "disk full");
        let rendered = error.to_string();
        assert!(rendered.contains("storage"));
        assert!(rendered.contains("save"));
        assert!(rendered.contains("disk full"));
        assert!(!rendered.contains('['));
    }

    #[test]
    fn test_display_with_entity() {
        let error = RepositoryError::storage(RepositoryOperation::Save, "disk full")
            .with_entity("Employee", "42");
        assert!(error.to_string().contains("[Employee: 42]"));
    }

    #[test]
    fn test_with_operation() {
        let error =
            RepositoryError::connection_failed("refused").with_operation(RepositoryOperation::Count);
        assert_eq!(error.operation, RepositoryOperation::Count);
    }

    #[test]
    fn test_is_retriable() {
        assert!(RepositoryError::connection_failed("refused").is_retriable());
        assert!(RepositoryError::timeout(RepositoryOperation::Execute, "30s").is_retriable());
        assert!(!RepositoryError::storage(RepositoryOperation::Save, "boom").is_retriable());
        assert!(
            !RepositoryError::constraint_violation(RepositoryOperation::Save, "dup").is_retriable()
        );
    }
}
