//! Data-access core for the library catalog.
//! Authors and books persisted in SQLite behind a single context facade.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod settings;

pub use context::{AuthorQuery, BookQuery, LibraryContext, LibraryEntities};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::author::{Author, AuthorId, AUTHOR_NAME_MAX_CHARS};
pub use model::book::{Book, BookId, BOOK_TITLE_MAX_CHARS};
pub use model::genre::BookGenre;
pub use model::{EntityValidationError, UNASSIGNED_ID};
pub use repo::author_repo::{
    AuthorListQuery, AuthorOrder, AuthorRepository, SqliteAuthorRepository,
};
pub use repo::book_repo::{BookListQuery, BookOrder, BookRepository, SqliteBookRepository};
pub use repo::{RepoError, RepoResult};
pub use settings::{ConfigError, LibraryConfig, MEMORY_DATA_SOURCE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
