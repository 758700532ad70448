//! Book record.
//!
//! # Responsibility
//! - Describe a catalog entry and the author it is attributed to.
//!
//! # Invariants
//! - `title` is non-blank and at most `BOOK_TITLE_MAX_CHARS` characters once
//!   persisted.
//! - `author` must be a persisted author; only `author.id` is written, the
//!   rest of the record is resolved by a join on every read.

use super::author::{Author, AuthorId};
use super::genre::BookGenre;
use super::{
    check_assigned_id, check_id, check_required_text, EntityValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Primary key of a book row.
pub type BookId = i64;

/// Maximum title length, in characters.
pub const BOOK_TITLE_MAX_CHARS: usize = 100;

const ENTITY: &str = "book";

/// Catalog entry for one published work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier. `0` until first insert.
    pub id: BookId,
    pub title: String,
    /// Resolved author. Its id is the persisted foreign key.
    pub author: Author,
    /// Publication year. No range is enforced.
    pub year: i32,
    pub genre: BookGenre,
}

impl Book {
    /// Creates a book whose id will be assigned by the store on insert.
    pub fn new(title: impl Into<String>, author: Author, year: i32, genre: BookGenre) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            author,
            year,
            genre,
        }
    }

    /// Creates a book with a caller-provided id.
    ///
    /// # Errors
    /// - `InvalidId` when `id` is not positive.
    pub fn with_id(
        id: BookId,
        title: impl Into<String>,
        author: Author,
        year: i32,
        genre: BookGenre,
    ) -> Result<Self, EntityValidationError> {
        check_assigned_id(ENTITY, id)?;
        Ok(Self {
            id,
            title: title.into(),
            author,
            year,
            genre,
        })
    }

    /// Foreign key of the attributed author.
    pub fn author_id(&self) -> AuthorId {
        self.author.id
    }

    /// Checks field constraints enforced at write time.
    ///
    /// Existence of the referenced author is left to the store.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        check_id(ENTITY, self.id)?;
        check_required_text(ENTITY, "title", &self.title, BOOK_TITLE_MAX_CHARS)?;
        if !self.author.is_persisted() {
            return Err(EntityValidationError::UnassignedReference {
                entity: ENTITY,
                field: "author_id",
            });
        }
        Ok(())
    }
}
