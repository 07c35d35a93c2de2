//! Local-storage data layer for the movieshelf app.
//!
//! One store, one managed context, and a generic repository capability
//! (`BaseModel`) that every persisted entity adopts.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use context::{ManagedContext, ObjectState};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::movie::Movie;
pub use model::object_id::{ObjectId, ObjectIdParseError};
pub use model::recipe::Recipe;
pub use model::review::Review;
pub use provider::ContextProvider;
pub use repo::base_model::{BaseModel, Entity};
pub use repo::{RepoError, RepoResult};
pub use service::movie_service::{MovieService, NewMovie};
pub use service::preload::{preload_recipes, DATA_PRELOADED_FLAG};
pub use service::review_service::ReviewService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
