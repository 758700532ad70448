//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted record shapes for authors and books.
//! - Own field-level constraints checked at the persistence boundary.
//!
//! # Invariants
//! - An id of `0` means "not yet assigned"; assigned ids are always positive.
//! - Constraints are checked by `validate()`, never by constructors.

pub mod author;
pub mod book;
pub mod genre;

use thiserror::Error;

/// Id value carried by records that the store has not assigned yet.
pub const UNASSIGNED_ID: i64 = 0;

/// Constraint violation detected before a record reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityValidationError {
    /// Required text field is empty or whitespace only.
    #[error("{entity}.{field} is required")]
    Blank {
        entity: &'static str,
        field: &'static str,
    },
    /// Text field exceeds its maximum length in characters.
    #[error("{entity}.{field} must be at most {max} characters, got {actual}")]
    TooLong {
        entity: &'static str,
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Identifier is outside the valid range.
    #[error("{entity}.id must be positive, got {id}")]
    InvalidId { entity: &'static str, id: i64 },
    /// Required reference points at a record that was never persisted.
    #[error("{entity}.{field} must reference a persisted record")]
    UnassignedReference {
        entity: &'static str,
        field: &'static str,
    },
}

pub(crate) fn check_required_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::Blank { entity, field });
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(EntityValidationError::TooLong {
            entity,
            field,
            max,
            actual,
        });
    }

    Ok(())
}

pub(crate) fn check_id(entity: &'static str, id: i64) -> Result<(), EntityValidationError> {
    if id < UNASSIGNED_ID {
        return Err(EntityValidationError::InvalidId { entity, id });
    }
    Ok(())
}

pub(crate) fn check_assigned_id(
    entity: &'static str,
    id: i64,
) -> Result<(), EntityValidationError> {
    if id <= UNASSIGNED_ID {
        return Err(EntityValidationError::InvalidId { entity, id });
    }
    Ok(())
}
