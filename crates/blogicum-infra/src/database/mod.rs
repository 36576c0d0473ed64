//! SeaORM persistence layer: connection management, entities and the
//! repository implementations.

mod comment_repo;
mod connection;
pub mod entity;
mod post_repo;
mod taxonomy_repo;
mod user_repo;

pub use comment_repo::PostgresCommentRepository;
pub use connection::DatabaseConfig;
pub use post_repo::PostgresPostRepository;
pub use taxonomy_repo::{PostgresCategoryRepository, PostgresLocationRepository};
pub use user_repo::PostgresUserRepository;

use blogicum_core::error::RepoError;
use sea_orm::{DbErr, SqlErr};

/// Map a SeaORM error onto the repository error taxonomy. Unique-key
/// violations become [`RepoError::Constraint`] so handlers can answer 409.
pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return RepoError::Constraint(msg);
    }

    match e {
        DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(_) => RepoError::Connection(e.to_string()),
        _ => RepoError::Query(e.to_string()),
    }
}

#[cfg(test)]
mod tests;
