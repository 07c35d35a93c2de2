//! View-model facing use cases.
//!
//! # Responsibility
//! - Turn screen actions (add review, list reviews, preload) into
//!   repository calls on the shared context.
//! - Keep UI layers unaware of storage details.

pub mod movie_service;
pub mod preload;
pub mod review_service;
