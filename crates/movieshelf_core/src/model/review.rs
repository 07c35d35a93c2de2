//! Review entity and its reference to the reviewed movie.
//!
//! # Invariants
//! - `movie` is a reference resolved through the context, not a copy.
//! - Deleting the referenced movie clears the reference on commit.
//! - Staging a review that still names a deleted movie stages it unattached.

use crate::context::ManagedContext;
use crate::model::movie::{Movie, MOVIE_ENTITY};
use crate::model::now_epoch_ms;
use crate::model::object_id::ObjectId;
use crate::repo::base_model::{BaseModel, Entity};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entity (table) name for reviews.
pub const REVIEW_ENTITY: &str = "reviews";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ObjectId,
    pub title: String,
    pub text: String,
    /// Unix epoch milliseconds.
    pub published_at: i64,
    movie: Option<ObjectId>,
}

impl Review {
    /// Creates a transient, unattached review published now.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: ObjectId::generate(REVIEW_ENTITY),
            title: title.into(),
            text: text.into(),
            published_at: now_epoch_ms(),
            movie: None,
        }
    }

    /// Creates a transient review already pointing at `movie`.
    pub fn for_movie(movie: &Movie, title: impl Into<String>, text: impl Into<String>) -> Self {
        let mut review = Self::new(title, text);
        review.set_movie(Some(movie));
        review
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn movie_id(&self) -> Option<ObjectId> {
        self.movie
    }

    pub fn set_movie(&mut self, movie: Option<&Movie>) {
        self.movie = movie.map(Movie::id);
    }

    /// Resolves the reviewed movie through `ctx`.
    pub fn movie(&self, ctx: &ManagedContext) -> Option<Movie> {
        self.movie.and_then(|id| Movie::by_id(ctx, &id))
    }
}

impl Entity for Review {
    const ENTITY_NAME: &'static str = REVIEW_ENTITY;
    const COLUMNS: &'static [&'static str] = &["title", "text", "published_at", "movie_uuid"];

    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn to_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::from(self.title.clone()),
            Value::from(self.text.clone()),
            Value::from(self.published_at),
            Value::from(self.movie.map(|id| id.key().to_string())),
        ])
    }

    fn from_row(id: ObjectId, row: &Row<'_>) -> RepoResult<Self> {
        let movie = match row.get::<_, Option<String>>("movie_uuid")? {
            Some(text) => {
                let key = Uuid::parse_str(&text).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid uuid value `{text}` in reviews.movie_uuid"
                    ))
                })?;
                Some(ObjectId::new(MOVIE_ENTITY, key))
            }
            None => None,
        };

        Ok(Self {
            id,
            title: row.get("title")?,
            text: row.get("text")?,
            published_at: row.get("published_at")?,
            movie,
        })
    }

    fn references(&self) -> Vec<ObjectId> {
        self.movie.into_iter().collect()
    }

    fn clear_reference(&mut self, target: &ObjectId) {
        if self.movie.as_ref() == Some(target) {
            self.movie = None;
        }
    }
}

impl BaseModel for Review {}
