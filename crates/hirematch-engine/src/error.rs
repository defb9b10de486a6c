use hirematch_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

pub(crate) fn not_found(what: &str) -> EngineError {
    EngineError::NotFound(format!("{what} not found"))
}

pub(crate) trait ConflictExt<T> {
    /// Turns a UNIQUE collision into [`EngineError::Conflict`]; other store errors
    /// stay internal.
    fn or_conflict(self, message: &str) -> Result<T>;
}

impl<T> ConflictExt<T> for hirematch_db::Result<T> {
    fn or_conflict(self, message: &str) -> Result<T> {
        self.map_err(|e| match e {
            DbError::UniqueViolation(_) => EngineError::Conflict(message.to_string()),
            other => EngineError::Storage(other),
        })
    }
}
