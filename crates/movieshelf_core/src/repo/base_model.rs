//! `Entity` storage mapping and the `BaseModel` capability.
//!
//! A type adopts the capability with an empty impl:
//!
//! ```ignore
//! impl BaseModel for Movie {}
//!
//! let movie = Movie::new("Inception");
//! movie.save(&mut ctx);
//! let movies = Movie::all(&ctx);
//! ```

use crate::context::ManagedContext;
use crate::model::object_id::ObjectId;
use crate::repo::RepoResult;
use log::{error, warn};
use rusqlite::types::Value;
use rusqlite::Row;

/// Maps one Rust type onto one storage collection.
///
/// # Invariants
/// - `ENTITY_NAME` is both the table name and the `ObjectId` entity name.
/// - `to_values` yields exactly one value per entry of `COLUMNS`, in order.
/// - `COLUMNS` never includes the `uuid` key column.
pub trait Entity: Clone + Send + 'static {
    const ENTITY_NAME: &'static str;
    const COLUMNS: &'static [&'static str];

    fn object_id(&self) -> ObjectId;

    fn to_values(&self) -> RepoResult<Vec<Value>>;

    /// Decodes one row selected as `uuid, COLUMNS...`.
    fn from_row(id: ObjectId, row: &Row<'_>) -> RepoResult<Self>;

    /// Ids of other instances this one points at.
    fn references(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    /// Nulls every reference to `target`.
    fn clear_reference(&mut self, _target: &ObjectId) {}
}

/// Generic CRUD capability with one shared implementation.
///
/// The `try_*` methods report storage failures. The plain methods keep the
/// permissive behaviour view-models rely on: a failed commit rolls back and
/// logs, a failed fetch yields empty or absent.
pub trait BaseModel: Entity {
    /// Stages this instance's current state and commits the whole context.
    ///
    /// Every other pending change in `ctx` becomes durable too. On failure
    /// all of them are discarded, not just this instance's.
    fn try_save(&self, ctx: &mut ManagedContext) -> RepoResult<()> {
        ctx.insert(self);
        ctx.save()
    }

    fn save(&self, ctx: &mut ManagedContext) {
        if let Err(err) = self.try_save(ctx) {
            error!(
                "event=model_save module=repo status=error entity={} id={} error={err}",
                Self::ENTITY_NAME,
                self.object_id()
            );
        }
    }

    /// Stages removal of this instance, then commits like [`BaseModel::try_save`].
    fn try_delete(&self, ctx: &mut ManagedContext) -> RepoResult<()> {
        ctx.delete(self);
        ctx.save()
    }

    fn delete(&self, ctx: &mut ManagedContext) {
        if let Err(err) = self.try_delete(ctx) {
            error!(
                "event=model_delete module=repo status=error entity={} id={} error={err}",
                Self::ENTITY_NAME,
                self.object_id()
            );
        }
    }

    /// Every instance of `Self` visible through `ctx`, in unspecified order.
    fn try_all(ctx: &ManagedContext) -> RepoResult<Vec<Self>> {
        ctx.fetch_all::<Self>()
    }

    /// Like [`BaseModel::try_all`], but a failed query yields an empty list.
    fn all(ctx: &ManagedContext) -> Vec<Self> {
        Self::try_all(ctx).unwrap_or_else(|err| {
            warn!(
                "event=model_all module=repo status=error entity={} error={err}",
                Self::ENTITY_NAME
            );
            Vec::new()
        })
    }

    /// Resolves `id` to an instance of `Self`.
    ///
    /// Returns `Ok(None)` when the id is unknown, deleted, or names another
    /// entity kind.
    fn try_by_id(ctx: &ManagedContext, id: &ObjectId) -> RepoResult<Option<Self>> {
        ctx.existing_object::<Self>(id)
    }

    fn by_id(ctx: &ManagedContext, id: &ObjectId) -> Option<Self> {
        Self::try_by_id(ctx, id).unwrap_or_else(|err| {
            error!(
                "event=model_by_id module=repo status=error entity={} id={id} error={err}",
                Self::ENTITY_NAME
            );
            None
        })
    }
}
