// src/db/models/user.rs

//! User model - registered accounts

use super::Image;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str =
    "UserID, Username, DisplayName, BioText, DateJoined, PasswordHash, ProfileImageID";

/// A registered user
///
/// The password hash is kept crate-private and is never printed.
#[derive(Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub bio_text: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub profile_image_id: Option<String>,
    pub(crate) password_hash: Vec<u8>,
}

impl User {
    /// Insert this user into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO User (UserID, Username, DisplayName, BioText, DateJoined, PasswordHash, ProfileImageID)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &self.id,
                &self.username,
                &self.display_name,
                &self.bio_text,
                &self.date_joined,
                &self.password_hash,
                &self.profile_image_id,
            ],
        )?;
        Ok(())
    }

    /// Find a user by ID
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM User WHERE UserID = ?1"))?;
        let user = stmt.query_row([id], Self::from_row).optional()?;
        Ok(user)
    }

    /// Find a user by username (case-insensitive)
    pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM User WHERE Username = ?1"))?;
        let user = stmt.query_row([username], Self::from_row).optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM User ORDER BY DateJoined"))?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Update the display name
    pub fn update_display_name(&mut self, conn: &Connection, display_name: &str) -> Result<()> {
        conn.execute(
            "UPDATE User SET DisplayName = ?1 WHERE UserID = ?2",
            params![display_name, &self.id],
        )?;
        self.display_name = display_name.to_string();
        Ok(())
    }

    /// Update the biography text
    pub fn update_bio_text(&mut self, conn: &Connection, bio_text: Option<&str>) -> Result<()> {
        conn.execute(
            "UPDATE User SET BioText = ?1 WHERE UserID = ?2",
            params![bio_text, &self.id],
        )?;
        self.bio_text = bio_text.map(String::from);
        Ok(())
    }

    /// Update the profile image reference
    pub fn update_profile_image(&mut self, conn: &Connection, image: Option<&Image>) -> Result<()> {
        let image_id = image.map(|i| i.id.clone());
        conn.execute(
            "UPDATE User SET ProfileImageID = ?1 WHERE UserID = ?2",
            params![&image_id, &self.id],
        )?;
        self.profile_image_id = image_id;
        Ok(())
    }

    /// Resolve the profile image, if any
    pub fn profile_image(&self, conn: &Connection) -> Result<Option<Image>> {
        match &self.profile_image_id {
            Some(image_id) => Image::find_by_id(conn, image_id),
            None => Ok(None),
        }
    }

    /// Convert a database row to a User
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            display_name: row.get(2)?,
            bio_text: row.get(3)?,
            date_joined: row.get(4)?,
            password_hash: row.get(5)?,
            profile_image_id: row.get(6)?,
        })
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("bio_text", &self.bio_text)
            .field("date_joined", &self.date_joined)
            .field("profile_image_id", &self.profile_image_id)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            username: "angela".to_string(),
            display_name: "Angela".to_string(),
            bio_text: None,
            date_joined: Utc::now(),
            profile_image_id: None,
            password_hash: b"secret-hash".to_vec(),
        }
    }

    #[test]
    fn test_debug_redacts_hash() {
        let printed = format!("{:?}", sample_user());
        assert!(printed.contains("angela"));
        assert!(!printed.contains("password_hash"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_user_crud() {
        let conn = db::open_in_memory().unwrap();
        let mut user = sample_user();
        user.insert(&conn).unwrap();

        let found = User::find_by_username(&conn, "ANGELA").unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.date_joined, user.date_joined);
        assert_eq!(found.password_hash, b"secret-hash".to_vec());

        user.update_bio_text(&conn, Some("Hello")).unwrap();
        let found = User::find_by_id(&conn, "u1").unwrap().unwrap();
        assert_eq!(found.bio_text.as_deref(), Some("Hello"));
        assert!(found.profile_image(&conn).unwrap().is_none());

        assert_eq!(User::list_all(&conn).unwrap().len(), 1);
    }
}
