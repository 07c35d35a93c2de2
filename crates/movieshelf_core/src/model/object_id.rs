//! Stable identifier for persisted entity instances.
//!
//! # Invariants
//! - An id names exactly one storage row: entity (table) name plus UUID key.
//! - The key is never nil and never reused for another instance.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque handle used to re-resolve an entity instance through the context.
///
/// Obtained from an instance (`entity.object_id()`), never constructed from
/// raw parts by callers. Rendered as `<entity>/<uuid>` (`movies/<uuid>`) for
/// logs and for round-tripping through UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    entity: &'static str,
    key: Uuid,
}

impl ObjectId {
    pub(crate) fn new(entity: &'static str, key: Uuid) -> Self {
        Self { entity, key }
    }

    pub(crate) fn generate(entity: &'static str) -> Self {
        Self::new(entity, Uuid::new_v4())
    }

    /// Name of the entity kind (storage collection) this id belongs to.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Row key inside the entity's collection.
    pub fn key(&self) -> Uuid {
        self.key
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity, self.key)
    }
}

/// Entity names an `ObjectId` may be parsed into.
const KNOWN_ENTITIES: &[&str] = &[
    crate::model::movie::MOVIE_ENTITY,
    crate::model::review::REVIEW_ENTITY,
    crate::model::recipe::RECIPE_ENTITY,
];

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (entity, key) = value
            .trim()
            .split_once('/')
            .ok_or_else(|| ObjectIdParseError::Malformed(value.to_string()))?;
        let entity = KNOWN_ENTITIES
            .iter()
            .copied()
            .find(|known| *known == entity)
            .ok_or_else(|| ObjectIdParseError::UnknownEntity(entity.to_string()))?;
        let key =
            Uuid::parse_str(key).map_err(|_| ObjectIdParseError::Malformed(value.to_string()))?;
        if key.is_nil() {
            return Err(ObjectIdParseError::NilKey);
        }
        Ok(Self::new(entity, key))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Failure parsing an `ObjectId` from its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdParseError {
    Malformed(String),
    UnknownEntity(String),
    NilKey,
}

impl Display for ObjectIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "malformed object id `{value}`"),
            Self::UnknownEntity(entity) => write!(f, "unknown entity `{entity}`"),
            Self::NilKey => write!(f, "object id key must not be nil"),
        }
    }
}

impl Error for ObjectIdParseError {}

#[cfg(test)]
mod tests {
    use super::{ObjectId, ObjectIdParseError};

    #[test]
    fn display_and_parse_agree() {
        let id = ObjectId::generate("movies");
        let parsed: ObjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_unknown_entity() {
        let err = "actor/11111111-2222-4333-8444-555555555555"
            .parse::<ObjectId>()
            .unwrap_err();
        assert_eq!(err, ObjectIdParseError::UnknownEntity("actor".to_string()));
    }

    #[test]
    fn parse_rejects_nil_key() {
        let err = "movies/00000000-0000-0000-0000-000000000000"
            .parse::<ObjectId>()
            .unwrap_err();
        assert_eq!(err, ObjectIdParseError::NilKey);
    }
}
