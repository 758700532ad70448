//! Closed set of book categories.
//!
//! New categories are added as a variant plus its stored string; stored
//! strings must never be renamed once released.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Category a book is shelved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookGenre {
    Fiction,
    NonFiction,
    Poetry,
    Drama,
    Biography,
    Reference,
    Science,
    Children,
}

impl BookGenre {
    /// Every genre, in declaration order.
    pub const ALL: [BookGenre; 8] = [
        Self::Fiction,
        Self::NonFiction,
        Self::Poetry,
        Self::Drama,
        Self::Biography,
        Self::Reference,
        Self::Science,
        Self::Children,
    ];

    /// Stable string stored in `books.genre`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::NonFiction => "non_fiction",
            Self::Poetry => "poetry",
            Self::Drama => "drama",
            Self::Biography => "biography",
            Self::Reference => "reference",
            Self::Science => "science",
            Self::Children => "children",
        }
    }

    /// Parses the stored string form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.as_str() == value)
    }
}

impl Display for BookGenre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::BookGenre;
    use std::collections::HashSet;

    #[test]
    fn stored_strings_are_unique_and_parse_back() {
        let stored: HashSet<_> = BookGenre::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(stored.len(), BookGenre::ALL.len());

        for genre in BookGenre::ALL {
            assert_eq!(BookGenre::parse(genre.as_str()), Some(genre));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_display_case() {
        assert_eq!(BookGenre::parse("Fiction"), None);
        assert_eq!(BookGenre::parse("horror"), None);
    }
}
