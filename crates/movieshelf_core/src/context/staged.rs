//! Pending changes held by the managed context until commit.

use crate::model::object_id::ObjectId;
use crate::repo::base_model::Entity;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::any::Any;

/// Type-erased snapshot of one staged entity.
pub(super) trait StagedEntity: Send {
    fn staged_id(&self) -> ObjectId;
    fn write(&self, conn: &Connection) -> RepoResult<()>;
    fn as_any(&self) -> &dyn Any;
    fn detach(&mut self, target: &ObjectId);
}

impl<T: Entity> StagedEntity for T {
    fn staged_id(&self) -> ObjectId {
        self.object_id()
    }

    fn detach(&mut self, target: &ObjectId) {
        self.clear_reference(target);
    }

    fn write(&self, conn: &Connection) -> RepoResult<()> {
        let values = self.to_values()?;
        if values.len() != T::COLUMNS.len() {
            return Err(RepoError::InvalidData(format!(
                "{} produced {} values for {} columns",
                T::ENTITY_NAME,
                values.len(),
                T::COLUMNS.len()
            )));
        }

        let key = Value::Text(self.object_id().key().to_string());
        let mut stmt = conn.prepare_cached(&upsert_sql(T::ENTITY_NAME, T::COLUMNS))?;
        stmt.execute(params_from_iter(std::iter::once(key).chain(values)))?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) enum PendingChange {
    Upsert(Box<dyn StagedEntity>),
    Delete(ObjectId),
    Flag { name: String, enabled: bool },
}

impl PendingChange {
    pub(super) fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Upsert(staged) => Some(staged.staged_id()),
            Self::Delete(id) => Some(*id),
            Self::Flag { .. } => None,
        }
    }

    pub(super) fn apply(&self, conn: &Connection) -> RepoResult<()> {
        match self {
            Self::Upsert(staged) => staged.write(conn),
            Self::Delete(id) => {
                // Zero affected rows is fine: deleting an already-deleted
                // instance is a no-op.
                conn.execute(
                    &format!("DELETE FROM {} WHERE uuid = ?1;", id.entity()),
                    [id.key().to_string()],
                )?;
                Ok(())
            }
            Self::Flag { name, enabled } => {
                conn.execute(
                    "INSERT INTO app_flags (name, enabled) VALUES (?1, ?2)
                     ON CONFLICT(name) DO UPDATE SET enabled = excluded.enabled;",
                    params![name, i64::from(*enabled)],
                )?;
                Ok(())
            }
        }
    }
}

fn upsert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    let assignments = columns
        .iter()
        .map(|column| format!("{column} = excluded.{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} (uuid, {columns}) VALUES ({placeholders})
         ON CONFLICT(uuid) DO UPDATE SET {assignments},
            updated_at = (strftime('%s', 'now') * 1000);",
        columns = columns.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::upsert_sql;

    #[test]
    fn upsert_sql_binds_key_first_and_updates_every_column() {
        let sql = upsert_sql("movies", &["title", "director"]);
        assert!(sql.starts_with("INSERT INTO movies (uuid, title, director) VALUES (?1, ?2, ?3)"));
        assert!(sql.contains("title = excluded.title, director = excluded.director"));
        assert!(sql.contains("ON CONFLICT(uuid)"));
    }
}
