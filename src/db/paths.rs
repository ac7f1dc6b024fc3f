// src/db/paths.rs
//! Centralized path derivation for a RecipeDB data directory

use std::path::{Path, PathBuf};

/// Database file name inside the data directory
pub const DB_NAME: &str = "recipedb.db";

/// Configuration file name inside the data directory
pub const CONFIG_NAME: &str = "recipedb.json";

/// Image directory name inside the data directory
pub const IMAGE_DIR_NAME: &str = "images";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "_recipedb";

/// Characters stripped from user-supplied data directory paths
const FILENAME_BADCHARS: &[char] = &['*', '?', '<', '>', '|', '"'];

/// Remove characters that are never valid in a data directory path
pub fn clean_path(path: &str) -> PathBuf {
    let cleaned: String = path.chars().filter(|c| !FILENAME_BADCHARS.contains(c)).collect();
    PathBuf::from(cleaned)
}

/// Get the database path for a data directory
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_NAME)
}

/// Get the configuration file path for a data directory
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_NAME)
}

/// Get the image directory for a data directory
pub fn image_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(IMAGE_DIR_NAME)
}
