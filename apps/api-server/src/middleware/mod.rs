//! Request-level middleware: authentication extractors and error rendering.

pub mod auth;
pub mod error;
