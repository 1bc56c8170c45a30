//! Error codes carried by every failure envelope.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::BadRequest;
//! assert_eq!(code.as_str(), "BAD_REQUEST");
//! assert_eq!(code.code(), 1003);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body could not be read or parsed
    MissingRequest,
    /// Request body failed validation
    ValidationError,
    /// Request was understood but cannot be served as asked
    BadRequest,
    /// Requested resource was not found
    NotFound,

    // Server errors
    InternalError,
    ServiceUnavailable,

    // Infrastructure errors (2000-2999)
    DatabaseError,
    StorageError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequest => "MISSING_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            Self::MissingRequest => 1001,
            Self::ValidationError => 1002,
            Self::BadRequest => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,
            Self::DatabaseError => 2001,
            Self::StorageError => 2002,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
