// src/db/models/ingredient.rs

//! Ingredient model, alternate-name redirects and per-recipe quantities

use super::IngredientTag;
use crate::error::Result;
use crate::id::new_id;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "IngredientID, Name";

/// An ingredient with a canonical, case-insensitively unique name
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
}

impl Ingredient {
    /// Create a new Ingredient with a fresh id
    ///
    /// The name is stored as given; callers normalize it first.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }

    /// Insert this ingredient into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Ingredient (IngredientID, Name) VALUES (?1, ?2)",
            params![&self.id, &self.name],
        )?;
        Ok(())
    }

    /// Find an ingredient by ID
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare(&format!("SELECT {COLUMNS} FROM Ingredient WHERE IngredientID = ?1"))?;
        let ingredient = stmt.query_row([id], Self::from_row).optional()?;
        Ok(ingredient)
    }

    /// Find an ingredient by its canonical name (case-insensitive)
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Ingredient WHERE Name = ?1"))?;
        let ingredient = stmt.query_row([name], Self::from_row).optional()?;
        Ok(ingredient)
    }

    /// Find the ingredient an alternate name redirects to
    pub fn find_by_autocorrect(conn: &Connection, alternate_name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT Ingredient.IngredientID, Ingredient.Name
             FROM IngredientAutocorrect
             JOIN Ingredient ON Ingredient.IngredientID = IngredientAutocorrect.IngredientID
             WHERE IngredientAutocorrect.AlternateName = ?1",
        )?;
        let ingredient = stmt.query_row([alternate_name], Self::from_row).optional()?;
        Ok(ingredient)
    }

    /// List all ingredients by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Ingredient ORDER BY Name"))?;
        let ingredients = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    /// Register an alternate name redirecting to this ingredient
    pub fn insert_autocorrect(&self, conn: &Connection, alternate_name: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO IngredientAutocorrect (IngredientID, AlternateName) VALUES (?1, ?2)",
            params![&self.id, alternate_name],
        )?;
        Ok(())
    }

    /// All alternate names redirecting to this ingredient
    pub fn autocorrects(&self, conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT AlternateName FROM IngredientAutocorrect
             WHERE IngredientID = ?1 ORDER BY AlternateName",
        )?;
        let names = stmt
            .query_map([&self.id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Change the canonical name
    pub fn update_name(&mut self, conn: &Connection, name: &str) -> Result<()> {
        conn.execute(
            "UPDATE Ingredient SET Name = ?1 WHERE IngredientID = ?2",
            params![name, &self.id],
        )?;
        self.name = name.to_string();
        Ok(())
    }

    /// Attach a tag; attaching one already present is a no-op
    pub fn add_tag(&self, conn: &Connection, tag: &IngredientTag) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO Ingredient_IngredientTag_Map (IngredientID, IngredientTagID)
             VALUES (?1, ?2)",
            params![&self.id, &tag.id],
        )?;
        Ok(())
    }

    /// Detach a tag; returns whether it was attached
    pub fn remove_tag(&self, conn: &Connection, tag: &IngredientTag) -> Result<bool> {
        let count = conn.execute(
            "DELETE FROM Ingredient_IngredientTag_Map WHERE IngredientID = ?1 AND IngredientTagID = ?2",
            params![&self.id, &tag.id],
        )?;
        Ok(count > 0)
    }

    /// Tags directly attached to this ingredient
    pub fn tags(&self, conn: &Connection) -> Result<Vec<IngredientTag>> {
        IngredientTag::find_by_ingredient(conn, &self.id)
    }

    /// Convert a database row to an Ingredient
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An ingredient as used by one recipe, with quantity and descriptors
///
/// Equality is structural over (ingredient id, quantity, prefix, suffix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantitiedIngredient {
    pub ingredient: Ingredient,
    pub quantity: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl QuantitiedIngredient {
    /// Wrap an ingredient with no quantity or descriptors
    pub fn new(ingredient: Ingredient) -> Self {
        Self {
            ingredient,
            quantity: None,
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Insert the association row linking this ingredient to a recipe
    pub fn insert_for(&self, conn: &Connection, recipe_id: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO Recipe_Ingredient_Map
                (RecipeID, IngredientID, IngredientQuantity, IngredientPrefix, IngredientSuffix)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                recipe_id,
                &self.ingredient.id,
                &self.quantity,
                &self.prefix,
                &self.suffix,
            ],
        )?;
        Ok(())
    }

    /// All association rows for a recipe, in insertion order
    pub fn find_by_recipe(conn: &Connection, recipe_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT Ingredient.IngredientID, Ingredient.Name,
                    Recipe_Ingredient_Map.IngredientQuantity,
                    Recipe_Ingredient_Map.IngredientPrefix,
                    Recipe_Ingredient_Map.IngredientSuffix
             FROM Recipe_Ingredient_Map
             JOIN Ingredient ON Ingredient.IngredientID = Recipe_Ingredient_Map.IngredientID
             WHERE Recipe_Ingredient_Map.RecipeID = ?1
             ORDER BY Recipe_Ingredient_Map.rowid",
        )?;
        let rows = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Convert a joined association row to a QuantitiedIngredient
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            ingredient: Ingredient::from_row(row)?,
            quantity: row.get(2)?,
            prefix: row.get(3)?,
            suffix: row.get(4)?,
        })
    }
}

impl std::fmt::Display for QuantitiedIngredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [
            self.quantity.as_deref(),
            self.prefix.as_deref(),
            Some(self.ingredient.name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_ingredient_crud() {
        let conn = db::open_in_memory().unwrap();
        let mut eggs = Ingredient::new("Eggs");
        eggs.insert(&conn).unwrap();

        let found = Ingredient::find_by_name(&conn, "eggs").unwrap().unwrap();
        assert_eq!(found.id, eggs.id);
        assert_eq!(found.name, "Eggs");

        eggs.update_name(&conn, "Hen eggs").unwrap();
        let found = Ingredient::find_by_id(&conn, &eggs.id).unwrap().unwrap();
        assert_eq!(found.name, "Hen eggs");

        assert!(Ingredient::find_by_name(&conn, "eggs").unwrap().is_none());
    }

    #[test]
    fn test_autocorrect_lookup() {
        let conn = db::open_in_memory().unwrap();
        let eggplant = Ingredient::new("eggplant");
        eggplant.insert(&conn).unwrap();
        eggplant.insert_autocorrect(&conn, "aubergine").unwrap();

        let found = Ingredient::find_by_autocorrect(&conn, "Aubergine").unwrap().unwrap();
        assert_eq!(found, eggplant);
        assert_eq!(eggplant.autocorrects(&conn).unwrap(), vec!["aubergine".to_string()]);
        assert!(Ingredient::find_by_autocorrect(&conn, "brinjal").unwrap().is_none());
    }

    #[test]
    fn test_quantitied_display() {
        let q = QuantitiedIngredient::new(Ingredient::new("basil"))
            .with_quantity("2 cups")
            .with_prefix("fresh")
            .with_suffix("leaves");
        assert_eq!(q.to_string(), "2 cups fresh basil leaves");
        assert_eq!(QuantitiedIngredient::new(Ingredient::new("salt")).to_string(), "salt");
    }
}
