//! Movie entity.

use crate::context::ManagedContext;
use crate::model::object_id::ObjectId;
use crate::model::review::Review;
use crate::repo::base_model::{BaseModel, Entity};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Entity (table) name for movies.
pub const MOVIE_ENTITY: &str = "movies";

/// A movie on the shelf. Reviews point at it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    id: ObjectId,
    /// Must not be blank; the store rejects the commit otherwise.
    pub title: String,
    pub director: Option<String>,
    /// Unix epoch milliseconds.
    pub release_date: Option<i64>,
    /// Star rating in `0..=5`.
    pub rating: Option<u8>,
}

impl Movie {
    /// Creates a transient movie with a fresh id. Nothing is staged yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ObjectId::generate(MOVIE_ENTITY),
            title: title.into(),
            director: None,
            release_date: None,
            rating: None,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Reviews whose movie reference points at this movie.
    pub fn reviews(&self, ctx: &ManagedContext) -> Vec<Review> {
        Review::all(ctx)
            .into_iter()
            .filter(|review| review.movie_id() == Some(self.id))
            .collect()
    }
}

impl Entity for Movie {
    const ENTITY_NAME: &'static str = MOVIE_ENTITY;
    const COLUMNS: &'static [&'static str] = &["title", "director", "release_date", "rating"];

    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn to_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::from(self.title.clone()),
            Value::from(self.director.clone()),
            Value::from(self.release_date),
            Value::from(self.rating.map(i64::from)),
        ])
    }

    fn from_row(id: ObjectId, row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id,
            title: row.get("title")?,
            director: row.get("director")?,
            release_date: row.get("release_date")?,
            rating: row.get("rating")?,
        })
    }
}

impl BaseModel for Movie {}
