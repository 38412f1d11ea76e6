//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type returned by handlers,
//! the auth flow and the store. It implements `actix_web::error::ResponseError`
//! so every failure leaves the service as the same `{message, error?}` envelope
//! with a matching status code.
//!
//! `From` conversions for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and `actix_web::error::BlockingError` let the rest of
//! the crate propagate errors with `?`.

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::response::ApiResponse;

/// Represents all failures surfaced to clients.
#[derive(Debug)]
pub enum AppError {
    /// No credential, or a credential that is not shaped like `Bearer <token>` (HTTP 401).
    Unauthenticated(String),
    /// A credential was presented but failed verification (HTTP 403).
    Forbidden(String),
    /// A unique field is already taken (HTTP 400).
    Conflict(String),
    /// Login mismatch. Unknown email and wrong password deliberately share
    /// this variant (HTTP 400).
    InvalidCredentials,
    /// The resource does not exist or belongs to someone else (HTTP 404).
    NotFound(String),
    /// Malformed input rejected before reaching business logic (HTTP 400).
    ValidationError(Vec<String>),
    /// Unexpected store or infrastructure failure (HTTP 500).
    /// The detail is logged and never sent to the client.
    InternalError(String),
}

impl AppError {
    pub fn internal(detail: impl fmt::Display) -> Self {
        AppError::InternalError(detail.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::ValidationError(messages) => messages.join("; "),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(messages) => {
                write!(f, "Validation Error: {}", messages.join("; "))
            }
            AppError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_)
            | AppError::InvalidCredentials
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            AppError::InternalError(detail) => {
                log::error!("internal error: {}", detail);
                None
            }
            AppError::ValidationError(messages) if messages.len() > 1 => Some(json!(messages)),
            _ => None,
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::failure(self.client_message(), details))
    }
}

/// `RowNotFound` becomes `NotFound`, a unique violation becomes `Conflict`,
/// everything else is an internal failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// Field messages are sorted by field name so responses are stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();

        AppError::ValidationError(messages)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalError(format!("password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalError(format!("blocking task failed: {}", error))
    }
}
