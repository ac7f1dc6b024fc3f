// src/error.rs

//! Error types for RecipeDB
//!
//! Every fallible operation in the crate returns [`Result`]. Lookup misses,
//! uniqueness violations and hierarchy violations each have their own
//! variant so callers can match on them; storage and I/O failures are
//! wrapped transparently.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Image \"{0}\" does not exist.")]
    NoSuchImage(String),

    #[error("Ingredient \"{0}\" does not exist.")]
    NoSuchIngredient(String),

    #[error("IngredientTag \"{0}\" does not exist.")]
    NoSuchIngredientTag(String),

    #[error("Recipe \"{0}\" does not exist.")]
    NoSuchRecipe(String),

    #[error("Review \"{0}\" does not exist.")]
    NoSuchReview(String),

    #[error("User \"{0}\" does not exist.")]
    NoSuchUser(String),

    #[error("User \"{0}\" already exists.")]
    UserExists(String),

    #[error("Ingredient \"{0}\" already exists.")]
    IngredientExists(String),

    #[error("IngredientTag \"{tag}\" already has parent \"{parent}\".")]
    AlreadyHasParent { tag: String, parent: String },

    #[error("IngredientTag hierarchy contains a cycle at \"{0}\".")]
    TagCycle(String),

    #[error("Database is out of date. {current} should be {expected}.")]
    SchemaOutOfDate { current: i32, expected: i32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Name of the error kind in LOUD_SNAKE casing (`NoSuchUser` -> `NO_SUCH_USER`)
    ///
    /// Suitable as a stable status code when serializing the error for display.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::NoSuchImage(_) => "NO_SUCH_IMAGE",
            Error::NoSuchIngredient(_) => "NO_SUCH_INGREDIENT",
            Error::NoSuchIngredientTag(_) => "NO_SUCH_INGREDIENT_TAG",
            Error::NoSuchRecipe(_) => "NO_SUCH_RECIPE",
            Error::NoSuchReview(_) => "NO_SUCH_REVIEW",
            Error::NoSuchUser(_) => "NO_SUCH_USER",
            Error::UserExists(_) => "USER_EXISTS",
            Error::IngredientExists(_) => "INGREDIENT_EXISTS",
            Error::AlreadyHasParent { .. } => "ALREADY_HAS_PARENT",
            Error::TagCycle(_) => "TAG_CYCLE",
            Error::SchemaOutOfDate { .. } => "SCHEMA_OUT_OF_DATE",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::PasswordHash(_) => "PASSWORD_HASH",
            Error::Database(_) => "DATABASE",
            Error::Io(_) => "IO",
            Error::Config(_) => "CONFIG",
        }
    }

    /// True for any of the `NoSuch*` lookup misses
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NoSuchImage(_)
                | Error::NoSuchIngredient(_)
                | Error::NoSuchIngredientTag(_)
                | Error::NoSuchRecipe(_)
                | Error::NoSuchReview(_)
                | Error::NoSuchUser(_)
        )
    }
}

/// Whether a SQLite error is a UNIQUE or PRIMARY KEY constraint violation
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}
