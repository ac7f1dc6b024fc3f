// src/lib.rs

//! RecipeDB
//!
//! Storage and query engine for recipes, ingredients, ingredient tags,
//! users, images and reviews.
//!
//! # Architecture
//!
//! - SQLite-backed: every entity lives in one versioned database file
//! - Typed repository: [`RecipeDb`] is the only writer of rows
//! - Ingredient names are normalized and resolved through autocorrect
//!   redirects before lookup or creation
//! - Ingredient tags form a forest; closures walk upward through parents
//! - Recipe creation is a single transaction
//! - Search combines scalar filters with ingredient set inclusion/exclusion

pub mod auth;
pub mod config;
pub mod db;
mod error;
pub mod id;
pub mod repository;
pub mod session;
pub mod text;

pub use config::Config;
pub use db::models::{
    Image, Ingredient, IngredientTag, QuantitiedIngredient, Recipe, RecipeEdit, Review, User,
};
pub use error::{Error, Result};
pub use repository::{
    IngredientFilter, IngredientInput, NewRecipe, RecipeClosure, RecipeDb, SearchQuery,
};
pub use session::SessionStore;
