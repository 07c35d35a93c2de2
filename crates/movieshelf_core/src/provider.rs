//! Context provider: owns the store and its one managed context.
//!
//! # Responsibility
//! - Initialize the storage engine and build the context exactly once.
//! - Hand every caller the same context, one writer at a time.
//!
//! # Invariants
//! - `current_context` always yields the same `ManagedContext`.
//! - The provider is never torn down explicitly; it lives as long as its owner
//!   (the process, for [`ContextProvider::shared`]).

use crate::config::StoreConfig;
use crate::context::ManagedContext;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::RepoResult;
use log::{error, info};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SHARED_PROVIDER: OnceCell<ContextProvider> = OnceCell::new();

pub struct ContextProvider {
    store_path: Option<PathBuf>,
    context: Mutex<ManagedContext>,
}

impl ContextProvider {
    /// Opens the store described by `config`, creating its directory first.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        std::fs::create_dir_all(config.directory()).map_err(|source| DbError::Io {
            path: config.directory().to_path_buf(),
            source,
        })?;

        let store_path = config.store_path();
        let conn = open_db(&store_path)?;
        let provider = Self::from_connection(conn, Some(store_path))?;
        info!(
            "event=provider_init module=provider status=ok store_path={}",
            config.store_path().display()
        );
        Ok(provider)
    }

    /// Provider over a private in-memory store.
    pub fn in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?, None)
    }

    /// Process-wide provider at the default location, initialized on first use.
    ///
    /// # Panics
    /// Panics when the store cannot be opened. No entity operation can run
    /// without storage, so startup does not continue.
    pub fn shared() -> &'static ContextProvider {
        SHARED_PROVIDER.get_or_init(|| {
            let config = StoreConfig::default();
            match Self::open(&config) {
                Ok(provider) => provider,
                Err(err) => {
                    error!(
                        "event=provider_init module=provider status=error store_path={} error={err}",
                        config.store_path().display()
                    );
                    panic!("failed to initialize store: {err}");
                }
            }
        })
    }

    /// Installs `config` as the process-wide provider if none exists yet.
    ///
    /// Returns the already-installed provider when called again.
    pub fn init_shared(config: &StoreConfig) -> RepoResult<&'static ContextProvider> {
        SHARED_PROVIDER.get_or_try_init(|| Self::open(config))
    }

    /// The one context of this provider. Holding the guard blocks other callers.
    pub fn current_context(&self) -> MutexGuard<'_, ManagedContext> {
        // A panic while holding the guard leaves pending changes behind;
        // discard them so the next caller starts from durable state.
        self.context.lock().unwrap_or_else(|poisoned| {
            let mut ctx = PoisonError::into_inner(poisoned);
            ctx.rollback();
            self.context.clear_poison();
            ctx
        })
    }

    /// Store file location; `None` for in-memory providers.
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    fn from_connection(conn: Connection, store_path: Option<PathBuf>) -> RepoResult<Self> {
        Ok(Self {
            store_path,
            context: Mutex::new(ManagedContext::try_new(conn)?),
        })
    }
}
