//! Request handlers.
//!
//! Handlers map collaborator failures into [`AppError`](crate::error::AppError).

pub mod recognize;
