//! Application error type and its HTTP rendering.
//!
//! Handlers return `AppResult<T>`; failures surface as RFC 7807 problem
//! bodies with the status codes the blog contract promises: 404 for
//! anything hidden or missing, 403 for touching someone else's work,
//! 422 for rejected input.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blogicum_shared::ErrorResponse;
use std::fmt;

use blogicum_core::error::{RepoError, ValidationErrors};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized,
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(detail) => write!(f, "not found: {}", detail),
            AppError::Unauthorized => f.write_str("unauthorized"),
            AppError::Forbidden(detail) => write!(f, "forbidden: {}", detail),
            AppError::Conflict(detail) => write!(f, "conflict: {}", detail),
            AppError::Internal(detail) => write!(f, "internal error: {}", detail),
            AppError::Validation(problems) => {
                write!(f, "validation failed: {}", problems.join("; "))
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            AppError::NotFound(detail) => problem(status, "Not Found").with_detail(detail.clone()),
            AppError::Unauthorized => problem(status, "Unauthorized"),
            AppError::Forbidden(detail) => {
                problem(status, "Forbidden").with_detail(detail.clone())
            }
            AppError::Conflict(detail) => problem(status, "Conflict").with_detail(detail.clone()),
            AppError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                problem(status, "Internal Server Error")
            }
            AppError::Validation(problems) => {
                problem(status, "Validation Failed").with_detail(problems.join(", "))
            }
        };

        HttpResponse::build(status).json(body)
    }
}

fn problem(status: StatusCode, title: &str) -> ErrorResponse {
    ErrorResponse::new(status.as_u16(), title)
}

/// Storage failures keep their diagnostics in the log, not the response.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(message) => AppError::Conflict(message),
            RepoError::Connection(message) | RepoError::Query(message) => {
                tracing::error!("database failure: {}", message);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.0)
    }
}
