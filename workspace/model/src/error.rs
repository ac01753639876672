use sea_orm::{DbErr, SqlErr};
use std::fmt;
use thiserror::Error;
use tracing::error;

/// The precondition a caller violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// A required field (the email) was empty or absent.
    MissingRequiredField,
    /// The email is longer than the stored column allows.
    InvalidEmail,
    /// An elevated account was requested with a staff or superuser flag set to false.
    InvalidElevation,
    /// The username is too long or uses characters outside the allowed set.
    InvalidUsername,
    /// A first or last name is too long.
    InvalidName,
    /// A change-list ordering names a column that cannot be sorted on.
    InvalidOrdering,
    /// A change-list filter value is not one of the offered choices.
    InvalidFilter,
}

impl ValidationKind {
    /// Stable machine-readable code used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationKind::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ValidationKind::InvalidEmail => "INVALID_EMAIL",
            ValidationKind::InvalidElevation => "INVALID_ELEVATION",
            ValidationKind::InvalidUsername => "INVALID_USERNAME",
            ValidationKind::InvalidName => "INVALID_NAME",
            ValidationKind::InvalidOrdering => "INVALID_ORDERING",
            ValidationKind::InvalidFilter => "INVALID_FILTER",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationKind::MissingRequiredField => "missing required field",
            ValidationKind::InvalidEmail => "invalid email",
            ValidationKind::InvalidElevation => "invalid elevation request",
            ValidationKind::InvalidUsername => "invalid username",
            ValidationKind::InvalidName => "invalid name",
            ValidationKind::InvalidOrdering => "invalid ordering",
            ValidationKind::InvalidFilter => "invalid filter",
        };
        f.write_str(text)
    }
}

/// Error types for account operations
#[derive(Error, Debug)]
pub enum AccountError {
    /// Caller-supplied data violates a precondition; nothing was persisted.
    #[error("Validation error ({kind}): {message}")]
    Validation {
        kind: ValidationKind,
        message: String,
    },

    /// The store rejected the record because of a uniqueness constraint.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Error from deriving the password credential
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl AccountError {
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        AccountError::Validation {
            kind,
            message: message.into(),
        }
    }

    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            AccountError::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, AccountError::ConstraintViolation(_))
    }
}

impl From<DbErr> for AccountError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                AccountError::ConstraintViolation(detail)
            }
            _ => {
                error!(?err, "Database error");
                AccountError::Database(err)
            }
        }
    }
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AccountError::PasswordHash(err.to_string())
    }
}

/// Type alias for Result with AccountError
pub type Result<T> = std::result::Result<T, AccountError>;
