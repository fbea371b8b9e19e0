// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A movie with the same title, year and director already exists")]
    DuplicateMovie,

    #[error("The email {0} is already registered by another user")]
    DuplicateEmail(String),

    #[error("Movie '{0}' is still referenced by copies and cannot be deleted")]
    MovieInUse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True when the underlying SQLite error is a foreign-key constraint failure.
    /// A `RESTRICT` action is run as a trigger program and reports
    /// `SQLITE_CONSTRAINT_TRIGGER` with the foreign-key message instead.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::Database(rusqlite::Error::SqliteFailure(err, message)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
                    && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                        || (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
                            && message
                                .as_deref()
                                .is_some_and(|m| m.starts_with("FOREIGN KEY constraint failed"))))
            }
            _ => false,
        }
    }

    /// True when the underlying SQLite error is a UNIQUE constraint failure.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::Credential(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
