//! Recipe entity.
//!
//! List attributes (`highlights`, `directions`) are stored as JSON arrays.

use crate::model::object_id::ObjectId;
use crate::repo::base_model::{BaseModel, Entity};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Entity (table) name for recipes.
pub const RECIPE_ENTITY: &str = "recipes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    id: ObjectId,
    pub name: String,
    pub featured: bool,
    /// Bundled image asset name.
    pub image: String,
    pub summary: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub servings: u32,
    pub highlights: Vec<String>,
    pub directions: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::generate(RECIPE_ENTITY),
            name: name.into(),
            featured: false,
            image: String::new(),
            summary: String::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            total_time: String::new(),
            servings: 0,
            highlights: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Entity for Recipe {
    const ENTITY_NAME: &'static str = RECIPE_ENTITY;
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "featured",
        "image",
        "summary",
        "prep_time",
        "cook_time",
        "total_time",
        "servings",
        "highlights",
        "directions",
    ];

    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn to_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::from(self.name.clone()),
            Value::from(self.featured),
            Value::from(self.image.clone()),
            Value::from(self.summary.clone()),
            Value::from(self.prep_time.clone()),
            Value::from(self.cook_time.clone()),
            Value::from(self.total_time.clone()),
            Value::from(i64::from(self.servings)),
            Value::from(serde_json::to_string(&self.highlights)?),
            Value::from(serde_json::to_string(&self.directions)?),
        ])
    }

    fn from_row(id: ObjectId, row: &Row<'_>) -> RepoResult<Self> {
        let highlights: String = row.get("highlights")?;
        let directions: String = row.get("directions")?;

        Ok(Self {
            id,
            name: row.get("name")?,
            featured: row.get("featured")?,
            image: row.get("image")?,
            summary: row.get("summary")?,
            prep_time: row.get("prep_time")?,
            cook_time: row.get("cook_time")?,
            total_time: row.get("total_time")?,
            servings: row.get("servings")?,
            highlights: serde_json::from_str(&highlights)?,
            directions: serde_json::from_str(&directions)?,
        })
    }
}

impl BaseModel for Recipe {}
