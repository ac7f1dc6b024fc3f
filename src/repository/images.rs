// src/repository/images.rs

//! Image registration and content placement
//!
//! Image files are copied into the image directory under a path derived
//! from the image id alone:
//!
//! ```text
//! id:   3f9a0c12b7e4
//! path: <image_dir>/3f9a/0c12/b7e4.<ext>
//! ```
//!
//! The bytes are in place before the row is written, so a stored Image
//! never points at a missing file.

use super::RecipeDb;
use crate::config::MAX_READ_CHUNK;
use crate::db::models::Image;
use crate::error::{Error, Result};
use crate::id::new_id;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Length of each directory segment cut from an image id
const SEGMENT_LEN: usize = 4;

/// Relative storage path for an image id
///
/// The id is cut into 4-character groups; all but the last become
/// directories and the last becomes the file stem.
pub fn image_subpath(id: &str, extension: Option<&str>) -> PathBuf {
    let groups: Vec<String> = id
        .chars()
        .collect::<Vec<_>>()
        .chunks(SEGMENT_LEN)
        .map(|chunk| chunk.iter().collect())
        .collect();

    let mut path = PathBuf::new();
    if let Some((last, dirs)) = groups.split_last() {
        for dir in dirs {
            path.push(dir);
        }
        path.push(last);
    }
    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        path.set_extension(ext);
    }
    path
}

impl RecipeDb {
    /// Fetch an image by ID
    pub fn get_image(&self, id: &str) -> Result<Image> {
        Image::find_by_id(&self.conn, id)?.ok_or_else(|| Error::NoSuchImage(id.to_string()))
    }

    /// All registered images
    pub fn get_images(&self) -> Result<Vec<Image>> {
        Image::list_all(&self.conn)
    }

    /// Copy `source` into the image directory and register it
    ///
    /// The source file's extension is kept. If the row cannot be written
    /// the copied file is removed again.
    pub fn new_image(&self, source: impl AsRef<Path>) -> Result<Image> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(Error::InvalidArgument(format!(
                "image source is not a file: {}",
                source.display()
            )));
        }

        let id = new_id();
        let extension = source.extension().and_then(|e| e.to_str());
        let dest = self.image_dir.join(image_subpath(&id, extension));
        let file_path = dest
            .to_str()
            .ok_or_else(|| {
                Error::InvalidArgument(format!("image path is not UTF-8: {}", dest.display()))
            })?
            .to_string();

        self.copy_image_bytes(source, &dest)?;

        let image = Image::new(id, file_path);
        if let Err(e) = image.insert(&self.conn) {
            remove_orphan(&dest);
            return Err(e);
        }

        debug!("Created image {} at {}", image.id, image.file_path);
        Ok(image)
    }

    fn copy_image_bytes(&self, source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        // MAX_READ_CHUNK fits in any usize
        let chunk = self.config.file_read_chunk.clamp(1, MAX_READ_CHUNK) as usize;
        let mut reader = File::open(source)?;
        let mut writer = BufWriter::with_capacity(chunk, File::create(dest)?);

        let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.flush());
        if let Err(e) = copied {
            drop(writer);
            remove_orphan(dest);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Remove a copied image file that never got its row
fn remove_orphan(dest: &Path) {
    if let Err(e) = fs::remove_file(dest) {
        warn!("Failed to remove orphaned image {}: {}", dest.display(), e);
    }
}
