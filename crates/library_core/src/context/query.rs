//! Deferred, composable queries over catalog collections.
//!
//! # Invariants
//! - Builder methods never touch the store.
//! - Every terminal call (`fetch`, `count`, `first`, `exists`) re-executes
//!   against current store state, so a query value can be reused.

use crate::model::author::{Author, AuthorId};
use crate::model::book::Book;
use crate::model::genre::BookGenre;
use crate::repo::author_repo::{
    AuthorListQuery, AuthorOrder, AuthorRepository, SqliteAuthorRepository,
};
use crate::repo::book_repo::{BookListQuery, BookOrder, BookRepository, SqliteBookRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Lazily evaluated view over all authors.
#[derive(Clone)]
pub struct AuthorQuery<'ctx> {
    conn: &'ctx Connection,
    query: AuthorListQuery,
}

impl<'ctx> AuthorQuery<'ctx> {
    pub(crate) fn new(conn: &'ctx Connection) -> Self {
        Self {
            conn,
            query: AuthorListQuery::default(),
        }
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.query.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.query.last_name = Some(last_name.into());
        self
    }

    /// Keeps authors whose first or last name contains `text`, ignoring ASCII case.
    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        self.query.name_contains = Some(text.into());
        self
    }

    pub fn order_by(mut self, order: AuthorOrder) -> Self {
        self.query.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.query.offset = offset;
        self
    }

    /// Filter options accumulated so far.
    pub fn options(&self) -> &AuthorListQuery {
        &self.query
    }

    /// Executes the query and returns every matching author.
    pub fn fetch(&self) -> RepoResult<Vec<Author>> {
        self.repo().list_authors(&self.query)
    }

    /// Number of authors `fetch` would return.
    pub fn count(&self) -> RepoResult<u64> {
        let total = self.repo().count_authors(&self.query)?;
        Ok(page_len(total, self.query.limit, self.query.offset))
    }

    pub fn first(&self) -> RepoResult<Option<Author>> {
        let mut query = self.query.clone();
        query.limit = Some(self.query.limit.map_or(1, |limit| limit.min(1)));
        Ok(self.repo().list_authors(&query)?.into_iter().next())
    }

    pub fn exists(&self) -> RepoResult<bool> {
        Ok(self.count()? > 0)
    }

    fn repo(&self) -> SqliteAuthorRepository<'ctx> {
        SqliteAuthorRepository::new_unchecked(self.conn)
    }
}

/// Lazily evaluated view over all books, each with its author resolved.
#[derive(Clone)]
pub struct BookQuery<'ctx> {
    conn: &'ctx Connection,
    query: BookListQuery,
}

impl<'ctx> BookQuery<'ctx> {
    pub(crate) fn new(conn: &'ctx Connection) -> Self {
        Self {
            conn,
            query: BookListQuery::default(),
        }
    }

    pub fn author(mut self, author_id: AuthorId) -> Self {
        self.query.author_id = Some(author_id);
        self
    }

    pub fn genre(mut self, genre: BookGenre) -> Self {
        self.query.genre = Some(genre);
        self
    }

    pub fn title_contains(mut self, text: impl Into<String>) -> Self {
        self.query.title_contains = Some(text.into());
        self
    }

    /// Keeps books published between `from` and `to`, both inclusive.
    pub fn year_between(mut self, from: i32, to: i32) -> Self {
        self.query.year_from = Some(from);
        self.query.year_to = Some(to);
        self
    }

    pub fn published_in(self, year: i32) -> Self {
        self.year_between(year, year)
    }

    pub fn order_by(mut self, order: BookOrder) -> Self {
        self.query.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.query.offset = offset;
        self
    }

    pub fn options(&self) -> &BookListQuery {
        &self.query
    }

    /// Executes the query and returns every matching book.
    pub fn fetch(&self) -> RepoResult<Vec<Book>> {
        self.repo().list_books(&self.query)
    }

    /// Number of books `fetch` would return.
    pub fn count(&self) -> RepoResult<u64> {
        let total = self.repo().count_books(&self.query)?;
        Ok(page_len(total, self.query.limit, self.query.offset))
    }

    pub fn first(&self) -> RepoResult<Option<Book>> {
        let mut query = self.query.clone();
        query.limit = Some(self.query.limit.map_or(1, |limit| limit.min(1)));
        Ok(self.repo().list_books(&query)?.into_iter().next())
    }

    pub fn exists(&self) -> RepoResult<bool> {
        Ok(self.count()? > 0)
    }

    fn repo(&self) -> SqliteBookRepository<'ctx> {
        SqliteBookRepository::new_unchecked(self.conn)
    }
}

fn page_len(total: u64, limit: Option<u32>, offset: u32) -> u64 {
    let remaining = total.saturating_sub(u64::from(offset));
    match limit {
        Some(limit) => remaining.min(u64::from(limit)),
        None => remaining,
    }
}
