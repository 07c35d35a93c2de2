//! Managed context: the single unit of work over the store connection.
//!
//! # Responsibility
//! - Hold staged (inserted, updated, deleted) entity changes until commit.
//! - Commit every staged change in one storage transaction.
//! - Serve reads that reflect durable rows overlaid with staged changes.
//!
//! # Invariants
//! - A commit is all-or-nothing across every entity type.
//! - A failed commit leaves storage at the last durable state and the
//!   context with no pending changes.
//! - An instance deleted by a commit is never re-inserted by staging it again.

mod staged;

use crate::db::migrations::{latest_version, schema_version};
use crate::model::movie::MOVIE_ENTITY;
use crate::model::object_id::ObjectId;
use crate::model::recipe::RECIPE_ENTITY;
use crate::model::review::REVIEW_ENTITY;
use crate::repo::base_model::Entity;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info, warn};
use rusqlite::{Connection, Row};
use staged::PendingChange;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

const FLAGS_TABLE: &str = "app_flags";
const REQUIRED_TABLES: &[&str] = &[MOVIE_ENTITY, REVIEW_ENTITY, RECIPE_ENTITY, FLAGS_TABLE];

/// Lifecycle position of one entity instance relative to a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Not staged and not in storage.
    Transient,
    /// Staged for insert or update, not yet committed.
    Pending,
    /// Staged for removal, not yet committed.
    PendingDelete,
    /// Committed and unchanged since.
    Durable,
    /// Removed by a commit of this context.
    Deleted,
}

/// The single mutable unit of work mediating all entity reads and writes.
pub struct ManagedContext {
    conn: Connection,
    pending: Vec<PendingChange>,
    /// Ids removed by a commit of this context. Never pruned: it is what
    /// keeps a deleted instance from being re-inserted, so it grows by one
    /// entry per committed delete for the life of the context.
    deleted: HashSet<ObjectId>,
}

impl ManagedContext {
    /// Wraps a bootstrapped connection (see [`crate::db::open_db`]).
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` when an entity table is absent.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(&conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in REQUIRED_TABLES.iter().copied() {
            if !table_exists(&conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self {
            conn,
            pending: Vec::new(),
            deleted: HashSet::new(),
        })
    }

    /// Stages `entity`'s current state for insert-or-update.
    ///
    /// Restaging an id replaces its earlier snapshot. Ids that are marked
    /// for deletion, or were deleted by an earlier commit, are left alone.
    /// References to removed instances are nulled in the staged snapshot;
    /// the caller's instance is not touched.
    pub fn insert<T: Entity>(&mut self, entity: &T) {
        let id = entity.object_id();
        if self.is_removed(&id) {
            debug!(
                "event=context_stage module=context status=skipped op=upsert id={id} reason=deleted"
            );
            return;
        }

        let mut snapshot = entity.clone();
        for target in entity.references() {
            if self.is_removed(&target) {
                debug!(
                    "event=context_stage module=context status=detached id={id} target={target}"
                );
                snapshot.clear_reference(&target);
            }
        }
        self.replace_pending(id, PendingChange::Upsert(Box::new(snapshot)));
    }

    /// Stages removal of `entity` and nulls staged references to it.
    pub fn delete<T: Entity>(&mut self, entity: &T) {
        let id = entity.object_id();
        for change in &mut self.pending {
            if let PendingChange::Upsert(staged) = change {
                staged.detach(&id);
            }
        }
        self.replace_pending(id, PendingChange::Delete(id));
    }

    /// Stages a persisted boolean flag alongside entity changes.
    pub fn set_flag(&mut self, name: &str, enabled: bool) {
        self.pending.retain(
            |change| !matches!(change, PendingChange::Flag { name: staged, .. } if staged == name),
        );
        self.pending.push(PendingChange::Flag {
            name: name.to_string(),
            enabled,
        });
    }

    /// Reads a flag, honouring a staged value. Unknown flags read as `false`.
    pub fn flag(&self, name: &str) -> RepoResult<bool> {
        let staged = self.pending.iter().rev().find_map(|change| match change {
            PendingChange::Flag {
                name: staged,
                enabled,
            } if staged == name => Some(*enabled),
            _ => None,
        });
        if let Some(enabled) = staged {
            return Ok(enabled);
        }

        let mut stmt = self
            .conn
            .prepare_cached("SELECT enabled FROM app_flags WHERE name = ?1;")?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, i64>(0)? != 0),
            None => Ok(false),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Commits every pending change in one transaction.
    ///
    /// On failure all pending changes are discarded, including those of
    /// unrelated instances, and `RepoError::CommitFailed` is returned.
    pub fn save(&mut self) -> RepoResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let started_at = Instant::now();
        let pending = std::mem::take(&mut self.pending);
        match commit_changes(&mut self.conn, &pending) {
            Ok(()) => {
                for change in &pending {
                    if let PendingChange::Delete(id) = change {
                        self.deleted.insert(*id);
                    }
                }
                info!(
                    "event=context_save module=context status=ok changes={} duration_ms={}",
                    pending.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                // COMMIT failing on a deferred constraint can leave the
                // transaction open.
                if !self.conn.is_autocommit() {
                    if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK;") {
                        warn!("event=context_rollback module=context status=error error={rollback_err}");
                    }
                }
                warn!(
                    "event=context_save module=context status=error discarded={} duration_ms={} error={err}",
                    pending.len(),
                    started_at.elapsed().as_millis()
                );
                Err(RepoError::CommitFailed {
                    discarded: pending.len(),
                    source: Box::new(err),
                })
            }
        }
    }

    /// Discards every pending change without touching storage.
    pub fn rollback(&mut self) {
        let discarded = self.pending.len();
        self.pending.clear();
        if discarded > 0 {
            info!("event=context_rollback module=context status=ok discarded={discarded}");
        }
    }

    /// Reports where `id` sits in the entity lifecycle.
    pub fn state_of(&self, id: &ObjectId) -> RepoResult<ObjectState> {
        match self.pending_for(id) {
            Some(PendingChange::Delete(_)) => return Ok(ObjectState::PendingDelete),
            Some(_) => return Ok(ObjectState::Pending),
            None => {}
        }
        if self.deleted.contains(id) {
            return Ok(ObjectState::Deleted);
        }

        let exists: bool = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE uuid = ?1);", id.entity()),
            [id.key().to_string()],
            |row| row.get(0),
        )?;
        Ok(if exists {
            ObjectState::Durable
        } else {
            ObjectState::Transient
        })
    }

    /// Every instance of `T` visible through this context.
    ///
    /// Staged upserts replace or extend durable rows and staged deletions
    /// hide them. Order is unspecified.
    pub fn fetch_all<T: Entity>(&self) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare_cached(&select_sql::<T>(""))?;
        let mut rows = stmt.query([])?;
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        while let Some(row) = rows.next()? {
            let id = parse_row_id::<T>(row)?;
            seen.insert(id);
            match self.pending_for(&id) {
                Some(PendingChange::Delete(_)) => {}
                Some(PendingChange::Upsert(staged)) => {
                    found.extend(staged.as_any().downcast_ref::<T>().cloned());
                }
                Some(PendingChange::Flag { .. }) | None => found.push(T::from_row(id, row)?),
            }
        }

        for change in &self.pending {
            if let PendingChange::Upsert(staged) = change {
                if let Some(entity) = staged.as_any().downcast_ref::<T>() {
                    if !seen.contains(&entity.object_id()) {
                        found.push(entity.clone());
                    }
                }
            }
        }

        Ok(found)
    }

    /// Resolves `id` as an instance of `T`.
    ///
    /// Returns `Ok(None)` when the row is missing, staged for deletion, or
    /// when `id` names another entity kind.
    pub fn existing_object<T: Entity>(&self, id: &ObjectId) -> RepoResult<Option<T>> {
        if id.entity() != T::ENTITY_NAME {
            debug!(
                "event=context_resolve module=context status=mismatch id={id} requested={}",
                T::ENTITY_NAME
            );
            return Ok(None);
        }

        match self.pending_for(id) {
            Some(PendingChange::Delete(_)) => return Ok(None),
            Some(PendingChange::Upsert(staged)) => {
                return Ok(staged.as_any().downcast_ref::<T>().cloned())
            }
            Some(PendingChange::Flag { .. }) | None => {}
        }

        let mut stmt = self
            .conn
            .prepare_cached(&select_sql::<T>(" WHERE uuid = ?1"))?;
        let mut rows = stmt.query([id.key().to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(T::from_row(*id, row)?)),
            None => Ok(None),
        }
    }

    fn is_removed(&self, id: &ObjectId) -> bool {
        self.deleted.contains(id) || matches!(self.pending_for(id), Some(PendingChange::Delete(_)))
    }

    fn pending_for(&self, id: &ObjectId) -> Option<&PendingChange> {
        self.pending
            .iter()
            .find(|change| change.object_id().as_ref() == Some(id))
    }

    fn replace_pending(&mut self, id: ObjectId, change: PendingChange) {
        self.pending.retain(|existing| existing.object_id() != Some(id));
        self.pending.push(change);
    }
}

fn commit_changes(conn: &mut Connection, pending: &[PendingChange]) -> RepoResult<()> {
    let tx = conn.transaction()?;
    for change in pending {
        change.apply(&tx)?;
    }
    tx.commit()?;
    Ok(())
}

fn select_sql<T: Entity>(filter: &str) -> String {
    format!(
        "SELECT uuid, {} FROM {}{filter} ORDER BY rowid;",
        T::COLUMNS.join(", "),
        T::ENTITY_NAME
    )
}

fn parse_row_id<T: Entity>(row: &Row<'_>) -> RepoResult<ObjectId> {
    let key_text: String = row.get("uuid")?;
    let key = Uuid::parse_str(&key_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{key_text}` in {}.uuid",
            T::ENTITY_NAME
        ))
    })?;
    Ok(ObjectId::new(T::ENTITY_NAME, key))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}
