//! Identity access for records and DTOs
//!
//! The orchestrator locates, overwrites, and bulk-merges records by an opaque
//! identifier field without per-type code. Rather than looking the field up
//! by name at runtime, each record and DTO type implements [`HasIdentifier`]
//! once, so a missing capability is a compile error and the only runtime
//! condition left is "no identifier present" (`None`).

use std::fmt::Display;
use std::hash::Hash;

/// Read/write access to a type's identifier field
///
/// # Example
///
/// ```rust
/// use strata_access::identity::HasIdentifier;
///
/// struct Employee {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl HasIdentifier for Employee {
///     type Id = i64;
///
///     fn identifier(&self) -> Option<i64> {
///         self.id
///     }
///
///     fn set_identifier(&mut self, id: i64) {
///         self.id = Some(id);
///     }
/// }
///
/// let mut employee = Employee { id: None, name: "Alice".into() };
/// assert_eq!(employee.identifier(), None);
/// employee.set_identifier(7);
/// assert_eq!(employee.identifier(), Some(7));
/// ```
pub trait HasIdentifier {
    /// The identifier type
    type Id: Clone + Eq + Hash + Display + Send + Sync + 'static;

    /// The current identifier, if one is present
    fn identifier(&self) -> Option<Self::Id>;

    /// Overwrite the identifier
    ///
    /// Used by update paths to force the resolved identifier onto a freshly
    /// mapped record, so a mismatch between the caller-supplied id and the
    /// DTO content cannot silently create a new record.
    fn set_identifier(&mut self, id: Self::Id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Widget {
        id: Option<uuid::Uuid>,
    }

    impl HasIdentifier for Widget {
        type Id = uuid::Uuid;

        fn identifier(&self) -> Option<uuid::Uuid> {
            self.id
        }

        fn set_identifier(&mut self, id: uuid::Uuid) {
            self.id = Some(id);
        }
    }

    #[test]
    fn test_identifier_round_trip() {
        let mut widget = Widget { id: None };
        assert!(widget.identifier().is_none());
        let id = uuid::Uuid::new_v4();
        widget.set_identifier(id);
        assert_eq!(widget.identifier(), Some(id));
    }

    #[test]
    fn test_set_identifier_overwrites() {
        let first = uuid::Uuid::new_v4();
        let second = uuid::Uuid::new_v4();
        let mut widget = Widget { id: Some(first) };
        widget.set_identifier(second);
        assert_eq!(widget.identifier(), Some(second));
    }
}
