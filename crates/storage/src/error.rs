//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, duplicate, bad
//! reference) instead of inspecting SQLite error codes.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique or primary-key constraint violation.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// CHECK or NOT NULL constraint violation.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// SQL or connection failure.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// Connection pool exhausted or misconfigured.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    /// Attach entity context to a generic not-found error.
    #[must_use]
    pub fn for_entity(self, entity: &'static str, id: impl ToString) -> Self {
        match self {
            Self::NotFound { .. } => Self::not_found(entity, id),
            other => other,
        }
    }

    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Custom `From<rusqlite::Error>`, not a blanket `#[from]`.
///
/// - `QueryReturnedNoRows` → `NotFound` (generic; remap with `for_entity`)
/// - unique / primary key violations → `Duplicate`
/// - foreign key violations → `InvalidReference`
/// - other constraint violations → `Constraint`
/// - everything else → `Database`
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::NotFound { entity: "row", id: "unknown".into() }
            },
            rusqlite::Error::SqliteFailure(failure, msg)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let msg = msg.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::Duplicate(msg),
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::InvalidReference(msg),
                    _ => Self::Constraint(msg),
                }
            },
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
