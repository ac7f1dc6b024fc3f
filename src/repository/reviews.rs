// src/repository/reviews.rs

//! Recipe reviews
//!
//! A review ties one author to one recipe with a score and optional text.

use super::RecipeDb;
use crate::db::models::{Recipe, Review, User};
use crate::error::{Error, Result};
use tracing::debug;

impl RecipeDb {
    /// Fetch a review by ID
    pub fn get_review(&self, id: &str) -> Result<Review> {
        Review::find_by_id(&self.conn, id)?.ok_or_else(|| Error::NoSuchReview(id.to_string()))
    }

    /// Reviews left on `recipe`, oldest first
    pub fn get_reviews_for_recipe(&self, recipe: &Recipe) -> Result<Vec<Review>> {
        recipe.reviews(&self.conn)
    }

    /// Record `author`'s review of `recipe`
    pub fn new_review(
        &self,
        author: &User,
        recipe: &Recipe,
        score: i64,
        text: Option<&str>,
    ) -> Result<Review> {
        self.get_user(&author.id)?;
        self.get_recipe(&recipe.id)?;

        let review = Review::new(
            author.id.clone(),
            recipe.id.clone(),
            score,
            text.map(String::from),
        );
        review.insert(&self.conn)?;

        debug!("Created review {} on recipe {}", review.id, recipe.id);
        Ok(review)
    }
}
