// src/db/models/review.rs

//! Review model - a user's score and comment on a recipe

use super::{Recipe, User};
use crate::error::Result;
use crate::id::new_id;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "ReviewID, AuthorID, RecipeID, Score, Text";

#[derive(Debug, Clone)]
pub struct Review {
    pub id: String,
    pub author_id: String,
    pub recipe_id: String,
    pub score: i64,
    pub text: Option<String>,
}

impl Review {
    /// Create a new Review with a fresh id
    pub fn new(author_id: String, recipe_id: String, score: i64, text: Option<String>) -> Self {
        Self {
            id: new_id(),
            author_id,
            recipe_id,
            score,
            text,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            &format!("INSERT INTO Review ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            params![
                &self.id,
                &self.author_id,
                &self.recipe_id,
                &self.score,
                &self.text,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Review WHERE ReviewID = ?1"))?;
        let review = stmt.query_row([id], Self::from_row).optional()?;
        Ok(review)
    }

    pub fn find_by_recipe(conn: &Connection, recipe_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM Review WHERE RecipeID = ?1 ORDER BY rowid"
        ))?;
        let reviews = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    pub fn author(&self, conn: &Connection) -> Result<Option<User>> {
        User::find_by_id(conn, &self.author_id)
    }

    pub fn recipe(&self, conn: &Connection) -> Result<Option<Recipe>> {
        Recipe::find_by_id(conn, &self.recipe_id)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author_id: row.get(1)?,
            recipe_id: row.get(2)?,
            score: row.get(3)?,
            text: row.get(4)?,
        })
    }
}
