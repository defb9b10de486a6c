//! Store error types.

use thiserror::Error;

/// Errors from store operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An insert collided with a UNIQUE constraint.
    #[error("Uniqueness constraint violated: {0}")]
    UniqueViolation(String),

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DbError {
    /// Maps a failed write, singling out UNIQUE collisions so callers can report
    /// duplicates without a prior existence check.
    pub fn classify(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                DbError::UniqueViolation(msg.clone().unwrap_or_else(|| code.to_string()))
            }
            _ => DbError::Sqlite(err),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
