use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by record store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Timeout waiting for file lock - another user may be editing: {0:?}")]
    Locked(PathBuf),

    #[error("Database schema version {found} is not supported, expected {expected}")]
    SchemaOutdated { found: i32, expected: i32 },

    #[error("Store lock poisoned by a panicked thread")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(msg.unwrap_or_else(|| e.to_string()))
            }
            other => StoreError::Sqlite(other),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}
