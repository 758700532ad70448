//! Data-access context for the catalog.
//!
//! # Responsibility
//! - Own exactly one store connection for the lifetime of a unit of work.
//! - Expose authors and books as deferred queries and primary-key lookups.
//! - Route writes through repositories so validation always runs first.
//!
//! # Invariants
//! - The connection is migrated before the context is handed out.
//! - The connection is closed when the context is dropped or closed.
//! - Lookups never mutate store state.

mod query;

pub use query::{AuthorQuery, BookQuery};

use crate::db::{open_db_in_memory_with, open_db_with, DbError};
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::RepoResult;
use crate::settings::LibraryConfig;
use log::{debug, info, warn};
use rusqlite::Connection;

/// Read contract over the catalog collections.
pub trait LibraryEntities {
    /// All books, with authors resolved, as a deferred query.
    fn book_entities(&self) -> BookQuery<'_>;
    /// Book with primary key `id`, or `None`.
    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// All authors as a deferred query.
    fn author_entities(&self) -> AuthorQuery<'_>;
    /// Author with primary key `id`, or `None`.
    fn find_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
}

/// Single entry point between callers and the catalog store.
///
/// Not `Sync`: share across threads only behind external synchronization,
/// or better, open one context per unit of work.
pub struct LibraryContext {
    conn: Connection,
    config: LibraryConfig,
}

impl LibraryContext {
    /// Opens the catalog described by `config` and applies pending migrations.
    ///
    /// # Errors
    /// - `Config` when the settings cannot be honored.
    /// - `Connectivity` when the store cannot be opened or bootstrapped.
    pub fn open(config: &LibraryConfig) -> RepoResult<Self> {
        config.validate()?;

        let conn = match config.database_path() {
            Some(path) => open_db_with(path, config.busy_timeout())?,
            None => open_db_in_memory_with(config.busy_timeout())?,
        };

        info!(
            "event=context_open module=context status=ok catalog={} in_memory={} integrated_security={} multiple_active_result_sets={} trust_server_certificate={}",
            config.initial_catalog,
            config.is_in_memory(),
            config.integrated_security,
            config.multiple_active_result_sets,
            config.trust_server_certificate
        );

        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    /// Opens an isolated, empty in-memory catalog.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open(&LibraryConfig::in_memory())
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Inserts `author` and returns its id.
    ///
    /// An id of `0` is assigned by the store.
    pub fn add_author(&self, author: &Author) -> RepoResult<AuthorId> {
        let result = self.authors().create_author(author);
        log_write("author_add", result.as_ref().map_or(author.id, |id| *id), &result);
        result
    }

    /// Replaces the stored names of `author`.
    pub fn update_author(&self, author: &Author) -> RepoResult<()> {
        let result = self.authors().update_author(author);
        log_write("author_update", author.id, &result);
        result
    }

    /// Deletes the author with `id`.
    ///
    /// # Errors
    /// - `Integrity` while any book still references the author.
    /// - `NotFound` when no such author exists.
    pub fn remove_author(&self, id: AuthorId) -> RepoResult<()> {
        let result = self.authors().delete_author(id);
        log_write("author_remove", id, &result);
        result
    }

    /// Inserts `book` and returns its id.
    ///
    /// # Errors
    /// - `Integrity` when `book.author` does not exist in the store.
    pub fn add_book(&self, book: &Book) -> RepoResult<BookId> {
        let result = self.books().create_book(book);
        log_write("book_add", result.as_ref().map_or(book.id, |id| *id), &result);
        result
    }

    /// Replaces the stored fields of `book`, including its author reference.
    pub fn update_book(&self, book: &Book) -> RepoResult<()> {
        let result = self.books().update_book(book);
        log_write("book_update", book.id, &result);
        result
    }

    /// Deletes the book with `id`.
    pub fn remove_book(&self, id: BookId) -> RepoResult<()> {
        let result = self.books().delete_book(id);
        log_write("book_remove", id, &result);
        result
    }

    /// Reloads the author currently referenced by `book`.
    ///
    /// Returns `None` when the author no longer exists.
    pub fn load_author(&self, book: &Book) -> RepoResult<Option<Author>> {
        self.find_author(book.author_id())
    }

    /// Closes the connection, reporting any close failure.
    pub fn close(self) -> RepoResult<()> {
        self.conn
            .close()
            .map_err(|(_, err)| DbError::Sqlite(err).into())
    }

    fn authors(&self) -> SqliteAuthorRepository<'_> {
        SqliteAuthorRepository::new_unchecked(&self.conn)
    }

    fn books(&self) -> SqliteBookRepository<'_> {
        SqliteBookRepository::new_unchecked(&self.conn)
    }
}

impl LibraryEntities for LibraryContext {
    fn book_entities(&self) -> BookQuery<'_> {
        BookQuery::new(&self.conn)
    }

    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.books().get_book(id)
    }

    fn author_entities(&self) -> AuthorQuery<'_> {
        AuthorQuery::new(&self.conn)
    }

    fn find_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.authors().get_author(id)
    }
}

fn log_write<T>(event: &str, id: i64, result: &RepoResult<T>) {
    match result {
        Ok(_) => debug!("event={event} module=context status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=context status=error id={id} error_code={}",
            err.code()
        ),
    }
}
