//! Ledger errors for inventory invariants.
//!
//! These are the failures the ledger reports back to callers as structured
//! results. Storage and transport failures live in [`crate::error::Error`].
//!
//! # Examples
//!
//! ```
//! use pantry::domain::error::LedgerError;
//!
//! let err = LedgerError::not_found("inventory item", "Saffron");
//! assert_eq!(err.to_string(), "inventory item 'Saffron' not found");
//! ```

use thiserror::Error;

use super::id::ItemId;

/// Errors raised when ledger inputs or references are invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or missing required input.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// Id or name used for the lookup.
        key: String,
    },

    /// A transaction references an item that does not exist.
    #[error("transaction references missing inventory item {inventory_id}")]
    Referential {
        /// The dangling item id.
        inventory_id: ItemId,
    },

    /// The action executor does not know this action kind.
    #[error("unsupported action type '{kind}'")]
    UnsupportedAction {
        /// The action kind as submitted.
        kind: String,
    },
}

impl LedgerError {
    /// Shorthand for [`LedgerError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`LedgerError::NotFound`].
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_key() {
        let err = LedgerError::not_found("inventory item", "Flour");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("Flour"));
    }

    #[test]
    fn referential_message_includes_id() {
        let err = LedgerError::Referential {
            inventory_id: ItemId::new(42),
        };
        assert_eq!(
            err.to_string(),
            "transaction references missing inventory item 42"
        );
    }

    #[test]
    fn validation_message_includes_field() {
        let err = LedgerError::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
    }
}
