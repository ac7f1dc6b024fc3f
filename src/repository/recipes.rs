// src/repository/recipes.rs

//! Recipe creation, lookup and edits
//!
//! A recipe and its ingredient rows are written in one transaction.
//! Ingredients named by the caller are resolved (or created) inside the
//! same transaction, so a failure anywhere leaves no trace of the recipe,
//! its rows, or any ingredient created on its behalf.

use super::RecipeDb;
use super::ingredients::get_or_create_in;
use crate::db::{self, models::*};
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::debug;

/// One ingredient entry for a new recipe
#[derive(Debug, Clone)]
pub enum IngredientInput {
    /// A name, resolved through autocorrect and created on a miss
    Name(String),
    /// An existing ingredient, used as-is
    Ingredient(Ingredient),
    /// An existing ingredient with its quantity and descriptors
    Quantitied(QuantitiedIngredient),
    /// A name plus quantity and descriptors
    Quantity {
        name: String,
        quantity: Option<String>,
        prefix: Option<String>,
        suffix: Option<String>,
    },
}

impl From<&str> for IngredientInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IngredientInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Ingredient> for IngredientInput {
    fn from(ingredient: Ingredient) -> Self {
        Self::Ingredient(ingredient)
    }
}

impl From<QuantitiedIngredient> for IngredientInput {
    fn from(row: QuantitiedIngredient) -> Self {
        Self::Quantitied(row)
    }
}

/// `(quantity, name)`, e.g. `("2 cups", "flour")`
impl From<(&str, &str)> for IngredientInput {
    fn from((quantity, name): (&str, &str)) -> Self {
        Self::Quantity {
            name: name.to_string(),
            quantity: Some(quantity.to_string()),
            prefix: None,
            suffix: None,
        }
    }
}

impl IngredientInput {
    fn resolve(self, conn: &Connection) -> Result<QuantitiedIngredient> {
        let row = match self {
            Self::Name(name) => QuantitiedIngredient::new(get_or_create_in(conn, &name)?),
            Self::Ingredient(ingredient) => QuantitiedIngredient::new(existing(conn, ingredient)?),
            Self::Quantitied(mut row) => {
                row.ingredient = existing(conn, row.ingredient)?;
                row
            }
            Self::Quantity {
                name,
                quantity,
                prefix,
                suffix,
            } => QuantitiedIngredient {
                ingredient: get_or_create_in(conn, &name)?,
                quantity,
                prefix,
                suffix,
            },
        };
        Ok(row)
    }
}

/// Re-read a caller-supplied ingredient, failing if it is not stored
fn existing(conn: &Connection, ingredient: Ingredient) -> Result<Ingredient> {
    Ingredient::find_by_id(conn, &ingredient.id)?.ok_or(Error::NoSuchIngredient(ingredient.id))
}

/// Everything needed to create a recipe
#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    pub name: String,
    pub author_id: Option<String>,
    pub country_of_origin: Option<String>,
    pub meal_type: Option<String>,
    pub cuisine: Option<String>,
    pub prep_time: Option<i64>,
    pub blurb: Option<String>,
    pub serving_size: Option<i64>,
    pub instructions: Option<String>,
    pub recipe_image_id: Option<String>,
    pub ingredients: Vec<IngredientInput>,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn author(mut self, author: &User) -> Self {
        self.author_id = Some(author.id.clone());
        self
    }

    pub fn image(mut self, image: &Image) -> Self {
        self.recipe_image_id = Some(image.id.clone());
        self
    }

    pub fn country_of_origin(mut self, country: impl Into<String>) -> Self {
        self.country_of_origin = Some(country.into());
        self
    }

    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = Some(meal_type.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Preparation time in minutes
    pub fn prep_time(mut self, minutes: i64) -> Self {
        self.prep_time = Some(minutes);
        self
    }

    pub fn blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = Some(blurb.into());
        self
    }

    pub fn serving_size(mut self, servings: i64) -> Self {
        self.serving_size = Some(servings);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn ingredient(mut self, ingredient: impl Into<IngredientInput>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    pub fn ingredients<I, T>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IngredientInput>,
    {
        self.ingredients.extend(ingredients.into_iter().map(Into::into));
        self
    }
}

impl RecipeDb {
    /// Fetch a recipe by ID
    pub fn get_recipe(&self, id: &str) -> Result<Recipe> {
        Recipe::find_by_id(&self.conn, id)?.ok_or_else(|| Error::NoSuchRecipe(id.to_string()))
    }

    /// All recipes in storage order
    pub fn get_recipes(&self) -> Result<Vec<Recipe>> {
        Recipe::list_all(&self.conn)
    }

    /// Ingredient rows of `recipe`, in the order they were given
    pub fn get_recipe_ingredients(&self, recipe: &Recipe) -> Result<Vec<QuantitiedIngredient>> {
        recipe.ingredients(&self.conn)
    }

    /// Create a recipe and its ingredient rows atomically
    ///
    /// Author and image are optional but must exist when given.
    pub fn new_recipe(&self, new: NewRecipe) -> Result<Recipe> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidArgument("recipe name must not be empty".to_string()));
        }

        let recipe = db::transaction(&self.conn, |tx| {
            if let Some(author_id) = &new.author_id {
                if User::find_by_id(tx, author_id)?.is_none() {
                    return Err(Error::NoSuchUser(author_id.clone()));
                }
            }
            if let Some(image_id) = &new.recipe_image_id {
                if Image::find_by_id(tx, image_id)?.is_none() {
                    return Err(Error::NoSuchImage(image_id.clone()));
                }
            }

            let rows = new
                .ingredients
                .into_iter()
                .map(|input| input.resolve(tx))
                .collect::<Result<Vec<_>>>()?;

            let mut recipe = Recipe::new(name);
            recipe.author_id = new.author_id;
            recipe.country_of_origin = new.country_of_origin;
            recipe.meal_type = new.meal_type;
            recipe.cuisine = new.cuisine;
            recipe.prep_time = new.prep_time;
            recipe.blurb = new.blurb;
            recipe.serving_size = new.serving_size;
            recipe.instructions = new.instructions;
            recipe.recipe_image_id = new.recipe_image_id;
            recipe.insert(tx)?;

            for row in &rows {
                row.insert_for(tx, &recipe.id)?;
            }
            Ok(recipe)
        })?;

        debug!("Created recipe {} ({})", recipe.name, recipe.id);
        Ok(recipe)
    }

    /// Apply `edit` to `recipe` and return the stored result
    ///
    /// Only the provided columns are written; `DateModified` is bumped
    /// whenever anything changes.
    pub fn edit_recipe(&self, recipe: &Recipe, edit: &RecipeEdit) -> Result<Recipe> {
        let mut stored = self.get_recipe(&recipe.id)?;
        let mut edit = edit.clone();
        if let Some(name) = edit.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::InvalidArgument("recipe name must not be empty".to_string()));
            }
        }
        if let Some(Some(image_id)) = &edit.recipe_image_id {
            self.get_image(image_id)?;
        }

        stored.apply_edit(&self.conn, &edit)?;
        debug!("Edited recipe {}", stored.id);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, RecipeDb) {
        let temp_dir = tempfile::tempdir().unwrap();
        let rdb = RecipeDb::open_in_memory(temp_dir.path().join("images")).unwrap();
        (temp_dir, rdb)
    }

    #[test]
    fn test_new_recipe_round_trip() {
        let (_temp, rdb) = test_db();
        let author = rdb.new_user("angela", "Angela", "pw", None, None).unwrap();

        let recipe = rdb
            .new_recipe(
                NewRecipe::new("Cheese and Pesto Spread")
                    .author(&author)
                    .country_of_origin("Italy")
                    .meal_type("Appetizer")
                    .cuisine("Italian")
                    .prep_time(10)
                    .serving_size(4)
                    .blurb("Quick spread")
                    .instructions("Mix.\n\nServe.")
                    .ingredient(("8 oz", "cream_cheese"))
                    .ingredient("pesto"),
            )
            .unwrap();

        let found = rdb.get_recipe(&recipe.id).unwrap();
        assert_eq!(found.name, "Cheese and Pesto Spread");
        assert_eq!(found.author(rdb.conn()).unwrap(), Some(author));
        assert_eq!(found.country_of_origin.as_deref(), Some("Italy"));
        assert_eq!(found.meal_type.as_deref(), Some("Appetizer"));
        assert_eq!(found.cuisine.as_deref(), Some("Italian"));
        assert_eq!(found.prep_time, Some(10));
        assert_eq!(found.serving_size, Some(4));
        assert_eq!(found.blurb.as_deref(), Some("Quick spread"));
        assert_eq!(found.instruction_paragraphs(), vec!["Mix.", "Serve."]);
        assert_eq!(found.date_added, recipe.date_added);

        let rows = rdb.get_recipe_ingredients(&found).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ingredient.name, "cream cheese");
        assert_eq!(rows[0].quantity.as_deref(), Some("8 oz"));
        assert_eq!(rows[1].ingredient.name, "pesto");
        assert!(rows[1].quantity.is_none());
    }

    #[test]
    fn test_anonymous_recipe() {
        let (_temp, rdb) = test_db();
        let recipe = rdb.new_recipe(NewRecipe::new("Toast")).unwrap();

        let found = rdb.get_recipe(&recipe.id).unwrap();
        assert!(found.author(rdb.conn()).unwrap().is_none());
        assert!(found.image(rdb.conn()).unwrap().is_none());
        assert!(rdb.get_recipe_ingredients(&found).unwrap().is_empty());
    }

    #[test]
    fn test_new_recipe_reuses_ingredients() {
        let (_temp, rdb) = test_db();
        let eggs = rdb.new_ingredient("eggs").unwrap();
        rdb.add_autocorrect(&eggs, "egg").unwrap();

        let recipe = rdb
            .new_recipe(NewRecipe::new("Omelette").ingredient("Egg").ingredient("chives"))
            .unwrap();

        let rows = rdb.get_recipe_ingredients(&recipe).unwrap();
        assert_eq!(rows[0].ingredient, eggs);
        assert_eq!(rdb.get_ingredients().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_recipe_leaves_nothing() {
        let (_temp, rdb) = test_db();

        // The third entry repeats the first ingredient
        let result = rdb.new_recipe(
            NewRecipe::new("Pancakes").ingredients(["eggs", "milk", "EGGS", "flour"]),
        );
        assert!(result.is_err());

        assert!(rdb.get_recipes().unwrap().is_empty());
        assert!(rdb.get_ingredients().unwrap().is_empty());
        let rows: i64 = rdb
            .conn()
            .query_row("SELECT COUNT(*) FROM Recipe_Ingredient_Map", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_missing_references_rejected() {
        let (_temp, rdb) = test_db();
        let ghost_user = NewRecipe {
            author_id: Some("000000000000".to_string()),
            ..NewRecipe::new("Ghost")
        };
        assert!(matches!(rdb.new_recipe(ghost_user), Err(Error::NoSuchUser(_))));

        let ghost_ingredient = Ingredient::new("phantom");
        assert!(matches!(
            rdb.new_recipe(NewRecipe::new("Ghost").ingredient(ghost_ingredient)),
            Err(Error::NoSuchIngredient(_))
        ));
        assert!(rdb.get_recipes().unwrap().is_empty());
    }

    #[test]
    fn test_edit_recipe() {
        let (_temp, rdb) = test_db();
        let recipe = rdb
            .new_recipe(NewRecipe::new("Toast").cuisine("British"))
            .unwrap();

        let edited = rdb
            .edit_recipe(
                &recipe,
                &RecipeEdit {
                    name: Some("Buttered Toast".to_string()),
                    prep_time: Some(5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.name, "Buttered Toast");
        assert_eq!(edited.prep_time, Some(5));
        assert_eq!(edited.cuisine.as_deref(), Some("British"));
        assert!(edited.date_modified >= recipe.date_modified);

        let found = rdb.get_recipe(&recipe.id).unwrap();
        assert_eq!(found.name, "Buttered Toast");
        assert_eq!(found.date_modified, edited.date_modified);

        let bad_image = RecipeEdit {
            recipe_image_id: Some(Some("000000000000".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            rdb.edit_recipe(&recipe, &bad_image),
            Err(Error::NoSuchImage(_))
        ));
    }

    #[test]
    fn test_edit_recipe_trims_name() {
        let (_temp, rdb) = test_db();
        let recipe = rdb.new_recipe(NewRecipe::new("  Toast  ")).unwrap();
        assert_eq!(recipe.name, "Toast");

        let rename = |name: &str| RecipeEdit {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let edited = rdb.edit_recipe(&recipe, &rename("  Jam Toast \n")).unwrap();
        assert_eq!(edited.name, "Jam Toast");
        assert_eq!(rdb.get_recipe(&recipe.id).unwrap().name, "Jam Toast");

        assert!(matches!(
            rdb.edit_recipe(&recipe, &rename("   ")),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_recipe() {
        let (_temp, rdb) = test_db();
        assert!(matches!(rdb.get_recipe("nope"), Err(Error::NoSuchRecipe(_))));
    }
}
