//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Author::validate()` before SQL mutations.
//! - Deleting an author still referenced by books is rejected by the store.
//! - Listing is deterministic; ties fall back to `id ASC`.

use crate::model::author::{Author, AuthorId};
use crate::repo::{ensure_connection_ready, id_param, push_page, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ENTITY: &str = "author";

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name
FROM authors";

/// Sort order for author listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorOrder {
    #[default]
    Id,
    /// `last_name`, then `first_name`.
    Name,
}

/// Filter and pagination options for listing authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorListQuery {
    /// Exact first name match.
    pub first_name: Option<String>,
    /// Exact last name match.
    pub last_name: Option<String>,
    /// Case-insensitive substring of either name part.
    pub name_contains: Option<String>,
    pub order: AuthorOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for author persistence.
pub trait AuthorRepository {
    fn create_author(&self, author: &Author) -> RepoResult<AuthorId>;
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
    fn count_authors(&self, query: &AuthorListQuery) -> RepoResult<u64>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Skips the readiness check for connections owned by a context.
    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &Author) -> RepoResult<AuthorId> {
        author.validate()?;

        self.conn.execute(
            "INSERT INTO authors (id, first_name, last_name) VALUES (?1, ?2, ?3);",
            params![
                id_param(author.id),
                author.first_name.as_str(),
                author.last_name.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        author.validate()?;

        let changed = self.conn.execute(
            "UPDATE authors
             SET
                first_name = ?1,
                last_name = ?2
             WHERE id = ?3;",
            params![
                author.first_name.as_str(),
                author.last_name.as_str(),
                author.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                id: author.id,
            });
        }

        Ok(())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let author = stmt.query_row([id], parse_author_row).optional()?;
        Ok(author)
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let (where_sql, mut binds) = author_filter(query);
        let mut sql = format!("{AUTHOR_SELECT_SQL}{where_sql}");

        match query.order {
            AuthorOrder::Id => sql.push_str(" ORDER BY id ASC"),
            AuthorOrder::Name => sql.push_str(" ORDER BY last_name ASC, first_name ASC, id ASC"),
        }
        push_page(&mut sql, &mut binds, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let authors = stmt
            .query_map(params_from_iter(binds), parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn count_authors(&self, query: &AuthorListQuery) -> RepoResult<u64> {
        let (where_sql, binds) = author_filter(query);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM authors{where_sql};"),
            params_from_iter(binds),
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        Ok(())
    }
}

fn author_filter(query: &AuthorListQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut binds = Vec::new();

    if let Some(first_name) = &query.first_name {
        sql.push_str(" AND first_name = ?");
        binds.push(Value::Text(first_name.clone()));
    }
    if let Some(last_name) = &query.last_name {
        sql.push_str(" AND last_name = ?");
        binds.push(Value::Text(last_name.clone()));
    }
    if let Some(needle) = &query.name_contains {
        sql.push_str(
            " AND (instr(lower(first_name), lower(?)) > 0
                OR instr(lower(last_name), lower(?)) > 0)",
        );
        binds.push(Value::Text(needle.clone()));
        binds.push(Value::Text(needle.clone()));
    }

    (sql, binds)
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
