// src/repository/mod.rs

//! Typed repository over a RecipeDB store
//!
//! [`RecipeDb`] owns the database connection, the loaded configuration and
//! the image directory. Every create, fetch, search and hierarchy operation
//! goes through it:
//! - `users`: registration, lookup, password checks, profile edits
//! - `images`: image registration with content placement
//! - `ingredients`: name normalization, autocorrect redirects, tagging
//! - `tags`: the ingredient tag forest and closure computation
//! - `recipes`: atomic recipe creation and field edits
//! - `reviews`: recipe reviews
//! - `search`: scalar and ingredient-set filtering
//!
//! Each mutating call commits before returning. Recipe creation is the one
//! multi-statement write and runs inside a single transaction.

mod images;
mod ingredients;
mod recipes;
mod reviews;
mod search;
mod tags;
mod users;

pub use images::image_subpath;
pub use recipes::{IngredientInput, NewRecipe};
pub use search::{IngredientFilter, SearchQuery};
pub use tags::RecipeClosure;

use crate::config::{self, Config};
use crate::db::{self, paths};
use crate::error::{Error, Result, is_unique_violation};
use rusqlite::Connection;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An open RecipeDB store
pub struct RecipeDb {
    conn: Connection,
    data_dir: Option<PathBuf>,
    image_dir: PathBuf,
    config: Config,
    config_document: Value,
}

impl RecipeDb {
    /// Open the store rooted at `data_dir`, creating it if needed
    ///
    /// The schema check runs before anything else is read or written, so an
    /// out-of-date store fails with `SchemaOutOfDate` and is left untouched.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        let conn = db::open(paths::db_path(&data_dir))?;

        let config_document =
            config::load(&paths::config_path(&data_dir), &config::default_document())?;
        let config = Config::from_document(&config_document)?;

        let image_dir = paths::image_dir(&data_dir);
        fs::create_dir_all(&image_dir)?;

        info!("Opened RecipeDB at {}", data_dir.display());
        Ok(Self {
            conn,
            data_dir: Some(data_dir),
            image_dir,
            config,
            config_document,
        })
    }

    /// Open a throwaway in-memory store with default configuration
    ///
    /// Registered images are still copied into `image_dir`.
    pub fn open_in_memory(image_dir: impl AsRef<Path>) -> Result<Self> {
        let image_dir = image_dir.as_ref().to_path_buf();
        fs::create_dir_all(&image_dir)?;

        let config_document = config::default_document();
        let config = Config::from_document(&config_document)?;

        debug!("Opened in-memory RecipeDB, images in {}", image_dir.display());
        Ok(Self {
            conn: db::open_in_memory()?,
            data_dir: None,
            image_dir,
            config,
            config_document,
        })
    }

    /// The underlying connection, for resolving entity references
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The merged configuration document, including unrecognized keys
    pub fn config_document(&self) -> &Value {
        &self.config_document
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }
}

/// Replace a UNIQUE constraint failure with the domain `*Exists` error
pub(crate) fn exists_on_conflict(err: Error, exists: impl FnOnce() -> Error) -> Error {
    match &err {
        Error::Database(e) if is_unique_violation(e) => exists(),
        _ => err,
    }
}
