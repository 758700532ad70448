//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist books with their author foreign key.
//! - Resolve the attributed author on every read through an explicit join.
//!
//! # Invariants
//! - Write paths call `Book::validate()` before SQL mutations.
//! - Only `author.id` is written; author names always come from `authors`.
//! - Read paths reject unknown genre values instead of masking them.

use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use crate::model::genre::BookGenre;
use crate::repo::{ensure_connection_ready, id_param, push_page, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ENTITY: &str = "book";

const BOOK_FROM_SQL: &str = "FROM books b
INNER JOIN authors a ON a.id = b.author_id";

const BOOK_SELECT_SQL: &str = "SELECT
    b.id AS id,
    b.title AS title,
    b.year AS year,
    b.genre AS genre,
    a.id AS author_id,
    a.first_name AS author_first_name,
    a.last_name AS author_last_name";

/// Sort order for book listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrder {
    #[default]
    Id,
    Title,
    /// Publication year, oldest first.
    Year,
}

/// Filter and pagination options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListQuery {
    pub author_id: Option<AuthorId>,
    pub genre: Option<BookGenre>,
    /// Case-insensitive title substring.
    pub title_contains: Option<String>,
    /// Inclusive lower publication year bound.
    pub year_from: Option<i32>,
    /// Inclusive upper publication year bound.
    pub year_to: Option<i32>,
    pub order: BookOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for book persistence.
pub trait BookRepository {
    fn create_book(&self, book: &Book) -> RepoResult<BookId>;
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>>;
    fn count_books(&self, query: &BookListQuery) -> RepoResult<u64>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_books(&self, sql: &str, binds: Vec<Value>) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &Book) -> RepoResult<BookId> {
        book.validate()?;

        self.conn.execute(
            "INSERT INTO books (
                id,
                title,
                author_id,
                year,
                genre
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id_param(book.id),
                book.title.as_str(),
                book.author_id(),
                book.year,
                book.genre.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author_id = ?2,
                year = ?3,
                genre = ?4
             WHERE id = ?5;",
            params![
                book.title.as_str(),
                book.author_id(),
                book.year,
                book.genre.as_str(),
                book.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                id: book.id,
            });
        }

        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let sql = format!("{BOOK_SELECT_SQL} {BOOK_FROM_SQL} WHERE b.id = ?;");
        let mut books = self.query_books(&sql, vec![Value::Integer(id)])?;
        Ok(books.pop())
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let (where_sql, mut binds) = book_filter(query);
        let mut sql = format!("{BOOK_SELECT_SQL} {BOOK_FROM_SQL}{where_sql}");

        match query.order {
            BookOrder::Id => sql.push_str(" ORDER BY b.id ASC"),
            BookOrder::Title => sql.push_str(" ORDER BY b.title ASC, b.id ASC"),
            BookOrder::Year => sql.push_str(" ORDER BY b.year ASC, b.id ASC"),
        }
        push_page(&mut sql, &mut binds, query.limit, query.offset);

        self.query_books(&sql, binds)
    }

    fn count_books(&self, query: &BookListQuery) -> RepoResult<u64> {
        let (where_sql, binds) = book_filter(query);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) {BOOK_FROM_SQL}{where_sql};"),
            params_from_iter(binds),
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        Ok(())
    }
}

fn book_filter(query: &BookListQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut binds = Vec::new();

    if let Some(author_id) = query.author_id {
        sql.push_str(" AND b.author_id = ?");
        binds.push(Value::Integer(author_id));
    }
    if let Some(genre) = query.genre {
        sql.push_str(" AND b.genre = ?");
        binds.push(Value::Text(genre.as_str().to_string()));
    }
    if let Some(needle) = &query.title_contains {
        sql.push_str(" AND instr(lower(b.title), lower(?)) > 0");
        binds.push(Value::Text(needle.clone()));
    }
    if let Some(year_from) = query.year_from {
        sql.push_str(" AND b.year >= ?");
        binds.push(Value::Integer(i64::from(year_from)));
    }
    if let Some(year_to) = query.year_to {
        sql.push_str(" AND b.year <= ?");
        binds.push(Value::Integer(i64::from(year_to)));
    }

    (sql, binds)
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let genre_text: String = row.get("genre")?;
    let genre = BookGenre::parse(&genre_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid genre `{genre_text}` in books.genre"))
    })?;

    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: Author {
            id: row.get("author_id")?,
            first_name: row.get("author_first_name")?,
            last_name: row.get("author_last_name")?,
        },
        year: row.get("year")?,
        genre,
    })
}
