//! Traits the domain needs the outside world to implement.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    CategoryRepository, CommentRecord, CommentRepository, LocationRepository, PostRecord,
    PostRepository, UserRepository,
};
