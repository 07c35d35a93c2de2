//! Review use cases for a single movie.
//!
//! # Responsibility
//! - Back the add-review form and the per-movie review list.

use crate::model::movie::Movie;
use crate::model::object_id::ObjectId;
use crate::model::review::Review;
use crate::provider::ContextProvider;
use crate::repo::base_model::BaseModel;
use crate::repo::RepoResult;
use log::debug;

pub struct ReviewService<'p> {
    provider: &'p ContextProvider,
}

impl<'p> ReviewService<'p> {
    pub fn new(provider: &'p ContextProvider) -> Self {
        Self { provider }
    }

    /// Adds a review, published now, to the movie behind `movie_id`.
    ///
    /// Returns `Ok(None)` without writing anything when the movie cannot be
    /// resolved (unknown, deleted, or not a movie id).
    pub fn add_review_for_movie(
        &self,
        movie_id: &ObjectId,
        title: &str,
        text: &str,
    ) -> RepoResult<Option<ObjectId>> {
        let mut ctx = self.provider.current_context();
        let Some(movie) = Movie::try_by_id(&ctx, movie_id)? else {
            debug!("event=review_add module=service status=skipped movie_id={movie_id}");
            return Ok(None);
        };

        let review = Review::for_movie(&movie, title.trim(), text.trim());
        review.try_save(&mut ctx)?;
        Ok(Some(review.id()))
    }

    /// Reviews of the movie behind `movie_id`, newest first.
    ///
    /// An unresolvable movie yields an empty list.
    pub fn reviews_for_movie(&self, movie_id: &ObjectId) -> Vec<Review> {
        let ctx = self.provider.current_context();
        let Some(movie) = Movie::by_id(&ctx, movie_id) else {
            return Vec::new();
        };

        let mut reviews = movie.reviews(&ctx);
        reviews.sort_by(|left, right| right.published_at.cmp(&left.published_at));
        reviews
    }
}
