//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog platform.
//! This crate contains pure business logic with zero infrastructure
//! dependencies: the entities, the post-visibility rule, validation of
//! user input, and the ports the infrastructure implements.

pub mod domain;
pub mod error;
pub mod page;
pub mod ports;
pub mod validation;

pub use error::{RepoError, ValidationErrors};
