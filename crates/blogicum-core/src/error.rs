//! Errors shared across the domain and its ports.

use thiserror::Error;

/// Field-level validation failures, collected per request so a response
/// can report every bad field at once. Nothing is persisted when any
/// check fails.
#[derive(Debug, Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

/// What a repository call can come back with.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),
}
