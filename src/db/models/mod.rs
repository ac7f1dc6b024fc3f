// src/db/models/mod.rs

//! Data models for RecipeDB entities
//!
//! Each struct corresponds to one table and is decoded from a row by a
//! single `from_row` function over a fixed column list, so every query
//! that produces an entity goes through the same conversion. Entities are
//! read-only snapshots: they are not refreshed when the row changes.
//!
//! Two entities are equal iff they have the same type and the same id.

mod image;
mod ingredient;
mod ingredient_tag;
mod recipe;
mod review;
mod user;

pub use image::Image;
pub use ingredient::{Ingredient, QuantitiedIngredient};
pub use ingredient_tag::IngredientTag;
pub use recipe::{Recipe, RecipeEdit};
pub use review::Review;
pub use user::User;

/// Implement identity equality and hashing on the `id` field
macro_rules! impl_identity {
    ($($entity:ty),* $(,)?) => {
        $(
            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $entity {}

            impl std::hash::Hash for $entity {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )*
    };
}

impl_identity!(Image, Ingredient, IngredientTag, Recipe, Review, User);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rusqlite::Connection;
    use std::collections::HashSet;

    fn create_test_db() -> Connection {
        db::open_in_memory().unwrap()
    }

    #[test]
    fn test_identity_equality() {
        let a = Ingredient {
            id: "aaaa".to_string(),
            name: "eggs".to_string(),
        };
        let renamed = Ingredient {
            id: "aaaa".to_string(),
            name: "Eggs".to_string(),
        };
        let other = Ingredient {
            id: "bbbb".to_string(),
            name: "eggs".to_string(),
        };

        assert_eq!(a, renamed);
        assert_ne!(a, other);

        let set: HashSet<Ingredient> = [a, renamed, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_recipe_ingredient_rows() {
        let conn = create_test_db();

        let eggs = Ingredient::new("eggs");
        eggs.insert(&conn).unwrap();
        let milk = Ingredient::new("milk");
        milk.insert(&conn).unwrap();

        let recipe = Recipe::new("Custard".to_string());
        recipe.insert(&conn).unwrap();

        QuantitiedIngredient::new(eggs.clone())
            .with_quantity("3")
            .insert_for(&conn, &recipe.id)
            .unwrap();
        QuantitiedIngredient::new(milk.clone())
            .with_quantity("2 cups")
            .with_prefix("warm")
            .insert_for(&conn, &recipe.id)
            .unwrap();

        let rows = recipe.ingredients(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.contains(
            &QuantitiedIngredient::new(milk.clone())
                .with_quantity("2 cups")
                .with_prefix("warm")
        ));

        let ids = recipe.ingredient_ids(&conn).unwrap();
        assert_eq!(ids, [eggs.id, milk.id].into_iter().collect());
    }
}
