// ==========================================
// Brand backfill - repository errors
// ==========================================
// Tool: thiserror derive
// ==========================================

use rusqlite::ErrorCode;
use thiserror::Error;

/// Repository layer error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== schema discovery =====
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    #[error("could not find {field} column in table '{table}'; tried {candidates:?}, found columns {found:?}")]
    ColumnNotFound {
        table: String,
        field: String,
        candidates: Vec<String>,
        found: Vec<String>,
    },

    // ===== database errors =====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock failed: {0}")]
    LockError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    // ===== business rules =====
    #[error("no free slug for base '{base}' after {attempts} insert attempts")]
    SlugExhausted { base: String, attempts: usize },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) if code.code == ErrorCode::ConstraintViolation => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::ConstraintViolation(msg)
                }
            }
            rusqlite::Error::SqliteFailure(code, msg)
                if matches!(code.code, ErrorCode::CannotOpen | ErrorCode::NotADatabase) =>
            {
                RepositoryError::DatabaseConnectionError(msg.unwrap_or_else(|| code.to_string()))
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl RepositoryError {
    /// True when a UNIQUE index rejected the write
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepositoryError::UniqueConstraintViolation(_))
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
