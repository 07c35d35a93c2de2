//! Movie list use cases.
//!
//! # Responsibility
//! - Back the movie list and add-movie screens.
//!
//! # Invariants
//! - Every write goes through the provider's single context.

use crate::model::movie::Movie;
use crate::model::object_id::ObjectId;
use crate::provider::ContextProvider;
use crate::repo::base_model::BaseModel;
use crate::repo::RepoResult;

/// Form input for a new movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub director: Option<String>,
    /// Unix epoch milliseconds.
    pub release_date: Option<i64>,
    pub rating: Option<u8>,
}

pub struct MovieService<'p> {
    provider: &'p ContextProvider,
}

impl<'p> MovieService<'p> {
    pub fn new(provider: &'p ContextProvider) -> Self {
        Self { provider }
    }

    /// Creates and commits a movie, returning its id.
    ///
    /// Any other pending change in the shared context is committed with it.
    pub fn add_movie(&self, input: &NewMovie) -> RepoResult<ObjectId> {
        let mut movie = Movie::new(input.title.trim());
        movie.director = input
            .director
            .as_deref()
            .map(str::trim)
            .filter(|director| !director.is_empty())
            .map(str::to_string);
        movie.release_date = input.release_date;
        movie.rating = input.rating;

        let mut ctx = self.provider.current_context();
        movie.try_save(&mut ctx)?;
        Ok(movie.id())
    }

    /// Every movie, in unspecified order. Fetch failures read as empty.
    pub fn all_movies(&self) -> Vec<Movie> {
        let ctx = self.provider.current_context();
        Movie::all(&ctx)
    }

    /// Deletes the movie behind `id`. Returns `false` when it does not exist.
    ///
    /// Reviews of the movie stay, with their movie reference cleared.
    pub fn delete_movie(&self, id: &ObjectId) -> RepoResult<bool> {
        let mut ctx = self.provider.current_context();
        match Movie::try_by_id(&ctx, id)? {
            Some(movie) => {
                movie.try_delete(&mut ctx)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
