//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from the data-access context.
//! - Translate store failures into the catalog error taxonomy.
//!
//! # Invariants
//! - Repository writes call `validate()` before any SQL mutation.
//! - Store constraint violations surface as `RepoError::Integrity`.
//! - Lookups report absence as `None`; only writes use `NotFound`.

pub mod author_repo;
pub mod book_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::EntityValidationError;
use crate::settings::ConfigError;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every catalog data-access operation.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Store unreachable, bootstrap failed, or a transport-level SQL failure.
    #[error("catalog store unavailable: {0}")]
    Connectivity(#[from] DbError),
    #[error("invalid catalog settings: {0}")]
    Config(#[from] ConfigError),
    /// Record rejected before persistence.
    #[error("{0}")]
    Validation(#[from] EntityValidationError),
    /// Store rejected the write (foreign key, primary key or check constraint).
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("catalog repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("catalog repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("invalid persisted catalog data: {0}")]
    InvalidData(String),
}

impl RepoError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable error code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => "connectivity",
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Integrity(_) => "integrity",
            Self::NotFound { .. } => "not_found",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_required_table",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Integrity(message.unwrap_or_else(|| failure.to_string()))
            }
            rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..) => Self::InvalidData(value.to_string()),
            other => Self::Connectivity(DbError::Sqlite(other)),
        }
    }
}

const REQUIRED_TABLES: &[&str] = &["authors", "books"];

/// Rejects connections that were not opened through `crate::db`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Binds `0` ids as NULL so SQLite assigns the next rowid.
pub(crate) fn id_param(id: i64) -> Option<i64> {
    (id > crate::model::UNASSIGNED_ID).then_some(id)
}

/// Appends `LIMIT`/`OFFSET` clauses matching the requested page.
pub(crate) fn push_page(
    sql: &mut String,
    binds: &mut Vec<rusqlite::types::Value>,
    limit: Option<u32>,
    offset: u32,
) {
    use rusqlite::types::Value;

    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        binds.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            sql.push_str(" OFFSET ?");
            binds.push(Value::Integer(i64::from(offset)));
        }
    } else if offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        binds.push(Value::Integer(i64::from(offset)));
    }
}
