//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type returned by handlers, stores and the
//! authentication flow. Every variant maps to exactly one HTTP status and is
//! rendered as a JSON body of the form `{"error": "<message>"}`.
//!
//! `From` implementations exist for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` so that `?` can be used
//! throughout request handling.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all errors that can surface while serving a request.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    /// Used both for bad login credentials and for missing, invalid or expired tokens.
    Unauthorized(String),
    /// The request body could not be understood (HTTP 400).
    BadRequest(String),
    /// A required field is missing, empty or too long (HTTP 400).
    ValidationError(String),
    /// The username is already taken (HTTP 400).
    Conflict(String),
    /// The requested task does not exist (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A storage backend failure (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg,
        }
    }
}

/// Converts `AppError` variants into JSON `HttpResponse`s.
///
/// Duplicate usernames are reported as 400 rather than 409 to keep the
/// registration endpoint's contract to a single client-error status.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage details stay in the logs, not in the response body.
        let message = match self {
            AppError::DatabaseError(_) => "A storage error occurred",
            other => other.message(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, unique-constraint violations become
/// `Conflict`, everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User already exists".into())
            }
            _ => {
                log::error!("database error: {}", error);
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// JWT processing failures always surface as `Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}
