// src/db/models/image.rs

//! Image model - a file registered in the image directory

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const COLUMNS: &str = "ImageID, ImageFilePath";

/// An image file, immutable once registered
#[derive(Debug, Clone)]
pub struct Image {
    pub id: String,
    pub file_path: String,
}

impl Image {
    /// Create a new Image for an already-placed file
    pub fn new(id: String, file_path: String) -> Self {
        Self { id, file_path }
    }

    /// On-disk location of the image bytes
    pub fn path(&self) -> &Path {
        Path::new(&self.file_path)
    }

    /// Insert this image into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Image (ImageID, ImageFilePath) VALUES (?1, ?2)",
            params![&self.id, &self.file_path],
        )?;
        Ok(())
    }

    /// Find an image by ID
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Image WHERE ImageID = ?1"))?;
        let image = stmt.query_row([id], Self::from_row).optional()?;
        Ok(image)
    }

    /// List all images
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM Image"))?;
        let images = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }

    /// Convert a database row to an Image
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            file_path: row.get(1)?,
        })
    }
}
