//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

use sea_orm::SqlErr;

#[derive(Debug)]
pub enum DomainError {
    /// Required field missing or malformed
    Validation(String),
    /// Unique column collision (phone or email)
    Constraint(String),
    /// Resource not found
    NotFound,
    /// Request body exceeded the upload size limit
    PayloadTooLarge(String),
    /// I/O failure while storing an uploaded file
    Upload(String),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            DomainError::NotFound => write!(f, "Contact not found"),
            DomainError::PayloadTooLarge(msg) => write!(f, "Upload too large: {}", msg),
            DomainError::Upload(msg) => write!(f, "Upload failed: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Constraint(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Upload(e.to_string())
    }
}
