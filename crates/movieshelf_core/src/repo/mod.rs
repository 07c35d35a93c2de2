//! Repository capability shared by every persisted entity type.
//!
//! # Responsibility
//! - Define how an entity maps onto storage (`Entity`).
//! - Provide save/delete/all/by_id once, for every adopting type (`BaseModel`).
//!
//! # Invariants
//! - Commits are context-wide; a failed commit discards every pending change.
//! - Storage failures surface as `RepoError` on the `try_*` paths and degrade
//!   to no-op/empty/absent plus a log line on the convenience paths.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod base_model;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error for context, fetch and commit operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    CommitFailed {
        discarded: usize,
        source: Box<RepoError>,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::CommitFailed { discarded, source } => write!(
                f,
                "commit failed, {discarded} pending change(s) rolled back: {source}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::CommitFailed { source, .. } => Some(source.as_ref()),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}
