//! Domain entities persisted through the managed context.
//!
//! # Responsibility
//! - Define the movie/review/recipe records and their storage mapping.
//! - Provide the `ObjectId` handle used to re-resolve instances.
//!
//! # Invariants
//! - Every instance carries a stable `ObjectId` from construction on.
//! - Relationships are held as `ObjectId` references, never as copies.

pub mod movie;
pub mod object_id;
pub mod recipe;
pub mod review;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
