// src/db/models/recipe.rs

//! Recipe model

use super::{Image, QuantitiedIngredient, Review, User};
use crate::error::Result;
use crate::id::new_id;
use crate::text::{SLUG_MAX_LEN, slugify, split_paragraphs};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;

const COLUMNS: &str = "RecipeID, Name, AuthorID, CountryOfOrigin, MealType, Cuisine, PrepTime, \
                       DateAdded, DateModified, Blurb, ServingSize, Instructions, RecipeImageID";

/// A recipe; its ingredient rows live in `Recipe_Ingredient_Map`
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub author_id: Option<String>,
    pub country_of_origin: Option<String>,
    pub meal_type: Option<String>,
    pub cuisine: Option<String>,
    /// Preparation time in minutes
    pub prep_time: Option<i64>,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub blurb: Option<String>,
    pub serving_size: Option<i64>,
    pub instructions: Option<String>,
    pub recipe_image_id: Option<String>,
}

/// Field changes applied by [`Recipe::apply_edit`]; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct RecipeEdit {
    pub name: Option<String>,
    pub country_of_origin: Option<String>,
    pub meal_type: Option<String>,
    pub cuisine: Option<String>,
    pub prep_time: Option<i64>,
    pub blurb: Option<String>,
    pub serving_size: Option<i64>,
    pub instructions: Option<String>,
    /// `Some(None)` clears the image
    pub recipe_image_id: Option<Option<String>>,
}

impl RecipeEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country_of_origin.is_none()
            && self.meal_type.is_none()
            && self.cuisine.is_none()
            && self.prep_time.is_none()
            && self.blurb.is_none()
            && self.serving_size.is_none()
            && self.instructions.is_none()
            && self.recipe_image_id.is_none()
    }
}

impl Recipe {
    /// Create a new Recipe with a fresh id, stamped now
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name,
            author_id: None,
            country_of_origin: None,
            meal_type: None,
            cuisine: None,
            prep_time: None,
            date_added: now,
            date_modified: now,
            blurb: None,
            serving_size: None,
            instructions: None,
            recipe_image_id: None,
        }
    }

    /// Insert this recipe into the database (ingredient rows are separate)
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO Recipe ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                &self.id,
                &self.name,
                &self.author_id,
                &self.country_of_origin,
                &self.meal_type,
                &self.cuisine,
                &self.prep_time,
                &self.date_added,
                &self.date_modified,
                &self.blurb,
                &self.serving_size,
                &self.instructions,
                &self.recipe_image_id,
            ],
        )?;
        Ok(())
    }

    /// Find a recipe by ID
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Recipe WHERE RecipeID = ?1"))?;
        let recipe = stmt.query_row([id], Self::from_row).optional()?;
        Ok(recipe)
    }

    /// List all recipes in storage order
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        Self::select(conn, "ORDER BY rowid", &[])
    }

    /// Run `SELECT <recipe columns> FROM Recipe <clause>` with bound parameters
    pub(crate) fn select(
        conn: &Connection,
        clause: &str,
        bindings: &[&dyn ToSql],
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Recipe {clause}"))?;
        let recipes = stmt
            .query_map(bindings, Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Apply `edit`, bump `date_modified`, and write only the changed columns
    pub fn apply_edit(&mut self, conn: &Connection, edit: &RecipeEdit) -> Result<()> {
        if edit.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut columns: Vec<&str> = Vec::new();
        let mut bindings: Vec<&dyn ToSql> = Vec::new();

        if let Some(name) = &edit.name {
            columns.push("Name");
            bindings.push(name);
        }
        if let Some(country) = &edit.country_of_origin {
            columns.push("CountryOfOrigin");
            bindings.push(country);
        }
        if let Some(meal_type) = &edit.meal_type {
            columns.push("MealType");
            bindings.push(meal_type);
        }
        if let Some(cuisine) = &edit.cuisine {
            columns.push("Cuisine");
            bindings.push(cuisine);
        }
        if let Some(prep_time) = &edit.prep_time {
            columns.push("PrepTime");
            bindings.push(prep_time);
        }
        if let Some(blurb) = &edit.blurb {
            columns.push("Blurb");
            bindings.push(blurb);
        }
        if let Some(serving_size) = &edit.serving_size {
            columns.push("ServingSize");
            bindings.push(serving_size);
        }
        if let Some(instructions) = &edit.instructions {
            columns.push("Instructions");
            bindings.push(instructions);
        }
        if let Some(image_id) = &edit.recipe_image_id {
            columns.push("RecipeImageID");
            bindings.push(image_id);
        }
        columns.push("DateModified");
        bindings.push(&now);
        bindings.push(&self.id);

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE Recipe SET {} WHERE RecipeID = ?{}",
            assignments.join(", "),
            columns.len() + 1
        );
        conn.execute(&sql, bindings.as_slice())?;

        if let Some(name) = &edit.name {
            self.name = name.clone();
        }
        if let Some(country) = &edit.country_of_origin {
            self.country_of_origin = Some(country.clone());
        }
        if let Some(meal_type) = &edit.meal_type {
            self.meal_type = Some(meal_type.clone());
        }
        if let Some(cuisine) = &edit.cuisine {
            self.cuisine = Some(cuisine.clone());
        }
        if let Some(prep_time) = edit.prep_time {
            self.prep_time = Some(prep_time);
        }
        if let Some(blurb) = &edit.blurb {
            self.blurb = Some(blurb.clone());
        }
        if let Some(serving_size) = edit.serving_size {
            self.serving_size = Some(serving_size);
        }
        if let Some(instructions) = &edit.instructions {
            self.instructions = Some(instructions.clone());
        }
        if let Some(image_id) = &edit.recipe_image_id {
            self.recipe_image_id = image_id.clone();
        }
        self.date_modified = now;
        Ok(())
    }

    /// Ingredient rows for this recipe
    pub fn ingredients(&self, conn: &Connection) -> Result<Vec<QuantitiedIngredient>> {
        QuantitiedIngredient::find_by_recipe(conn, &self.id)
    }

    /// Ids of every ingredient this recipe uses
    pub fn ingredient_ids(&self, conn: &Connection) -> Result<HashSet<String>> {
        let mut stmt =
            conn.prepare("SELECT IngredientID FROM Recipe_Ingredient_Map WHERE RecipeID = ?1")?;
        let ids = stmt
            .query_map([&self.id], |row| row.get(0))?
            .collect::<std::result::Result<HashSet<String>, _>>()?;
        Ok(ids)
    }

    /// Resolve the author; anonymous recipes yield None
    pub fn author(&self, conn: &Connection) -> Result<Option<User>> {
        match &self.author_id {
            Some(author_id) => User::find_by_id(conn, author_id),
            None => Ok(None),
        }
    }

    /// Resolve the recipe image, if any
    pub fn image(&self, conn: &Connection) -> Result<Option<Image>> {
        match &self.recipe_image_id {
            Some(image_id) => Image::find_by_id(conn, image_id),
            None => Ok(None),
        }
    }

    /// Reviews left on this recipe
    pub fn reviews(&self, conn: &Connection) -> Result<Vec<Review>> {
        Review::find_by_recipe(conn, &self.id)
    }

    /// URL slug derived from the name
    pub fn slug(&self) -> String {
        slugify(&self.name, SLUG_MAX_LEN)
    }

    /// Instructions split into paragraphs
    pub fn instruction_paragraphs(&self) -> Vec<String> {
        self.instructions
            .as_deref()
            .map(split_paragraphs)
            .unwrap_or_default()
    }

    /// Convert a database row to a Recipe
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            author_id: row.get(2)?,
            country_of_origin: row.get(3)?,
            meal_type: row.get(4)?,
            cuisine: row.get(5)?,
            prep_time: row.get(6)?,
            date_added: row.get(7)?,
            date_modified: row.get(8)?,
            blurb: row.get(9)?,
            serving_size: row.get(10)?,
            instructions: row.get(11)?,
            recipe_image_id: row.get(12)?,
        })
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
