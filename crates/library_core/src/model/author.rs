//! Author record.
//!
//! # Invariants
//! - `first_name` and `last_name` are non-blank and at most
//!   `AUTHOR_NAME_MAX_CHARS` characters once persisted.
//! - `id` never changes after the store assigns it.

use super::{
    check_assigned_id, check_id, check_required_text, EntityValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Primary key of an author row.
pub type AuthorId = i64;

/// Maximum length of each author name part, in characters.
pub const AUTHOR_NAME_MAX_CHARS: usize = 50;

const ENTITY: &str = "author";

/// Persisted author of one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Store-assigned identifier. `0` until first insert.
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// Creates an author whose id will be assigned by the store on insert.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Creates an author with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - `InvalidId` when `id` is not positive.
    pub fn with_id(
        id: AuthorId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, EntityValidationError> {
        check_assigned_id(ENTITY, id)?;
        Ok(Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        })
    }

    /// Checks field constraints enforced at write time.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        check_id(ENTITY, self.id)?;
        check_required_text(ENTITY, "first_name", &self.first_name, AUTHOR_NAME_MAX_CHARS)?;
        check_required_text(ENTITY, "last_name", &self.last_name, AUTHOR_NAME_MAX_CHARS)?;
        Ok(())
    }

    /// Returns whether the store has assigned this author an id.
    pub fn is_persisted(&self) -> bool {
        self.id > UNASSIGNED_ID
    }

    /// `"First Last"` display form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
