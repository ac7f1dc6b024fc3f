// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipedb::{NewRecipe, Recipe, RecipeDb};
use tempfile::TempDir;

/// Open a fresh on-disk store.
///
/// Returns (TempDir, RecipeDb) - keep the TempDir alive to prevent cleanup.
pub fn open_test_store() -> (TempDir, RecipeDb) {
    let temp_dir = tempfile::tempdir().unwrap();
    let rdb = RecipeDb::open(temp_dir.path().join("data")).unwrap();
    (temp_dir, rdb)
}

/// The three recipes used by the search tests.
pub struct SearchFixture {
    pub r1: Recipe,
    pub r2: Recipe,
    pub r3: Recipe,
}

/// Create R1 = {eggs, milk}, R2 = {eggs, flour}, R3 = {flour}.
pub fn create_search_fixture(rdb: &RecipeDb) -> SearchFixture {
    let r1 = rdb
        .new_recipe(NewRecipe::new("Custard").ingredients(["eggs", "milk"]))
        .unwrap();
    let r2 = rdb
        .new_recipe(NewRecipe::new("Pasta Dough").ingredients(["eggs", "flour"]))
        .unwrap();
    let r3 = rdb
        .new_recipe(NewRecipe::new("Flatbread").ingredient(("2 cups", "flour")))
        .unwrap();
    SearchFixture { r1, r2, r3 }
}

/// Sorted recipe names, for order-insensitive comparisons.
pub fn sorted_names(recipes: &[Recipe]) -> Vec<String> {
    let mut names: Vec<String> = recipes.iter().map(|r| r.name.clone()).collect();
    names.sort();
    names
}
