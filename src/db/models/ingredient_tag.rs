// src/db/models/ingredient_tag.rs

//! IngredientTag model - tags grouped into a forest by parent links

use super::Ingredient;
use crate::error::Result;
use crate::id::new_id;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "IngredientTagID, TagName, ParentTagID";

/// A tag that can be attached to ingredients
///
/// A tag has at most one parent; roots have `parent_id == None`.
#[derive(Debug, Clone)]
pub struct IngredientTag {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl IngredientTag {
    /// Create a new root tag with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Insert this tag into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO IngredientTag (IngredientTagID, TagName, ParentTagID) VALUES (?1, ?2, ?3)",
            params![&self.id, &self.name, &self.parent_id],
        )?;
        Ok(())
    }

    /// Find a tag by ID
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM IngredientTag WHERE IngredientTagID = ?1"
        ))?;
        let tag = stmt.query_row([id], Self::from_row).optional()?;
        Ok(tag)
    }

    /// Find the first tag with this name (case-insensitive)
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM IngredientTag WHERE TagName = ?1 ORDER BY rowid LIMIT 1"
        ))?;
        let tag = stmt.query_row([name], Self::from_row).optional()?;
        Ok(tag)
    }

    /// Tags attached directly to an ingredient
    pub fn find_by_ingredient(conn: &Connection, ingredient_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT IngredientTag.IngredientTagID, IngredientTag.TagName, IngredientTag.ParentTagID
             FROM Ingredient_IngredientTag_Map
             JOIN IngredientTag
               ON IngredientTag.IngredientTagID = Ingredient_IngredientTag_Map.IngredientTagID
             WHERE Ingredient_IngredientTag_Map.IngredientID = ?1
             ORDER BY IngredientTag.TagName",
        )?;
        let tags = stmt
            .query_map([ingredient_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// List all tags by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM IngredientTag ORDER BY TagName"))?;
        let tags = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Set or clear the parent link
    pub fn set_parent(&mut self, conn: &Connection, parent_id: Option<&str>) -> Result<()> {
        conn.execute(
            "UPDATE IngredientTag SET ParentTagID = ?1 WHERE IngredientTagID = ?2",
            params![parent_id, &self.id],
        )?;
        self.parent_id = parent_id.map(String::from);
        Ok(())
    }

    /// Get the parent tag, or None for a root
    pub fn parent(&self, conn: &Connection) -> Result<Option<Self>> {
        match &self.parent_id {
            Some(parent_id) => Self::find_by_id(conn, parent_id),
            None => Ok(None),
        }
    }

    /// Get all tags whose parent is this tag
    pub fn children(&self, conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM IngredientTag WHERE ParentTagID = ?1 ORDER BY TagName"
        ))?;
        let tags = stmt
            .query_map([&self.id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Ingredients carrying this tag directly
    pub fn ingredients(&self, conn: &Connection) -> Result<Vec<Ingredient>> {
        let mut stmt = conn.prepare(
            "SELECT Ingredient.IngredientID, Ingredient.Name
             FROM Ingredient_IngredientTag_Map
             JOIN Ingredient ON Ingredient.IngredientID = Ingredient_IngredientTag_Map.IngredientID
             WHERE Ingredient_IngredientTag_Map.IngredientTagID = ?1
             ORDER BY Ingredient.Name",
        )?;
        let ingredients = stmt
            .query_map([&self.id], Ingredient::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    /// Convert a database row to an IngredientTag
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
        })
    }
}

impl std::fmt::Display for IngredientTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
