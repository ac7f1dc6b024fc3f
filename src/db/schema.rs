// src/db/schema.rs

//! Database schema definition and version stamp
//!
//! The schema version lives in SQLite's `user_version` pragma. It is only
//! written by [`init`], which runs on a brand-new database, so an existing
//! stamp is never overwritten.

use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Full schema for version 1
///
/// All name-like text columns use `COLLATE NOCASE` so uniqueness and
/// equality lookups are case-insensitive.
const SCHEMA_V1: &str = "
    -- Images: files copied into the content-sharded image directory
    CREATE TABLE IF NOT EXISTS Image(
        ImageID TEXT PRIMARY KEY,
        ImageFilePath TEXT NOT NULL
    );

    -- Users
    CREATE TABLE IF NOT EXISTS User(
        UserID TEXT PRIMARY KEY,
        Username TEXT NOT NULL COLLATE NOCASE UNIQUE,
        DisplayName TEXT NOT NULL COLLATE NOCASE,
        BioText TEXT,
        DateJoined TEXT NOT NULL,
        PasswordHash BLOB NOT NULL,
        ProfileImageID TEXT,
        FOREIGN KEY (ProfileImageID) REFERENCES Image(ImageID)
    );
    CREATE INDEX IF NOT EXISTS index_User_Username ON User(Username COLLATE NOCASE);

    -- Ingredients and their alternate spellings
    CREATE TABLE IF NOT EXISTS Ingredient(
        IngredientID TEXT PRIMARY KEY,
        Name TEXT NOT NULL COLLATE NOCASE UNIQUE
    );
    CREATE INDEX IF NOT EXISTS index_Ingredient_Name ON Ingredient(Name COLLATE NOCASE);

    CREATE TABLE IF NOT EXISTS IngredientAutocorrect(
        IngredientID TEXT NOT NULL,
        AlternateName TEXT NOT NULL COLLATE NOCASE UNIQUE,
        FOREIGN KEY (IngredientID) REFERENCES Ingredient(IngredientID)
    );
    CREATE INDEX IF NOT EXISTS index_IngredientAutocorrect_AlternateName
        ON IngredientAutocorrect(AlternateName COLLATE NOCASE);

    -- Ingredient tags form a forest through ParentTagID
    CREATE TABLE IF NOT EXISTS IngredientTag(
        IngredientTagID TEXT PRIMARY KEY,
        TagName TEXT NOT NULL COLLATE NOCASE,
        ParentTagID TEXT,
        FOREIGN KEY (ParentTagID) REFERENCES IngredientTag(IngredientTagID)
    );
    CREATE INDEX IF NOT EXISTS index_IngredientTag_ParentTagID ON IngredientTag(ParentTagID);

    CREATE TABLE IF NOT EXISTS Ingredient_IngredientTag_Map(
        IngredientID TEXT NOT NULL,
        IngredientTagID TEXT NOT NULL,
        UNIQUE(IngredientID, IngredientTagID),
        FOREIGN KEY (IngredientID) REFERENCES Ingredient(IngredientID),
        FOREIGN KEY (IngredientTagID) REFERENCES IngredientTag(IngredientTagID)
    );
    CREATE INDEX IF NOT EXISTS index_Ingredient_IngredientTag_Map_IngredientTagID
        ON Ingredient_IngredientTag_Map(IngredientTagID);

    -- Recipes
    CREATE TABLE IF NOT EXISTS Recipe(
        RecipeID TEXT PRIMARY KEY,
        Name TEXT NOT NULL COLLATE NOCASE,
        AuthorID TEXT,
        CountryOfOrigin TEXT COLLATE NOCASE,
        MealType TEXT COLLATE NOCASE,
        Cuisine TEXT COLLATE NOCASE,
        PrepTime INTEGER,
        DateAdded TEXT NOT NULL,
        DateModified TEXT NOT NULL,
        Blurb TEXT,
        ServingSize INTEGER,
        Instructions TEXT,
        RecipeImageID TEXT,
        FOREIGN KEY (AuthorID) REFERENCES User(UserID),
        FOREIGN KEY (RecipeImageID) REFERENCES Image(ImageID)
    );
    CREATE INDEX IF NOT EXISTS index_Recipe_AuthorID ON Recipe(AuthorID);

    CREATE TABLE IF NOT EXISTS Recipe_Ingredient_Map(
        RecipeID TEXT NOT NULL,
        IngredientID TEXT NOT NULL,
        IngredientQuantity TEXT,
        IngredientPrefix TEXT,
        IngredientSuffix TEXT,
        UNIQUE(RecipeID, IngredientID),
        FOREIGN KEY (RecipeID) REFERENCES Recipe(RecipeID),
        FOREIGN KEY (IngredientID) REFERENCES Ingredient(IngredientID)
    );
    CREATE INDEX IF NOT EXISTS index_Recipe_Ingredient_Map_IngredientID
        ON Recipe_Ingredient_Map(IngredientID);

    -- Reviews
    CREATE TABLE IF NOT EXISTS Review(
        ReviewID TEXT PRIMARY KEY,
        AuthorID TEXT NOT NULL,
        RecipeID TEXT NOT NULL,
        Score INTEGER NOT NULL,
        Text TEXT,
        FOREIGN KEY (AuthorID) REFERENCES User(UserID),
        FOREIGN KEY (RecipeID) REFERENCES Recipe(RecipeID)
    );
    CREATE INDEX IF NOT EXISTS index_Review_RecipeID ON Review(RecipeID);
";

/// Read the stamped schema version (0 for an unstamped database)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Create every table and index, then stamp the current version
///
/// Runs as one transaction so a half-initialized store is never stamped.
pub fn init(conn: &Connection) -> Result<()> {
    debug!("Creating schema version {}", SCHEMA_VERSION);

    conn.execute_batch(&format!(
        "BEGIN;
         {SCHEMA_V1}
         PRAGMA user_version = {SCHEMA_VERSION};
         COMMIT;"
    ))?;

    info!("Schema version {} created successfully", SCHEMA_VERSION);
    Ok(())
}

/// Fail with `SchemaOutOfDate` unless the stamp equals [`SCHEMA_VERSION`]
pub fn check_version(conn: &Connection) -> Result<()> {
    let current = get_schema_version(conn)?;
    if current != SCHEMA_VERSION {
        return Err(Error::SchemaOutOfDate {
            current,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}
