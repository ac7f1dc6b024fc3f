// src/repository/users.rs

//! User registration, lookup and profile edits

use super::{RecipeDb, exists_on_conflict};
use crate::auth;
use crate::db::models::{Image, User};
use crate::error::{Error, Result};
use crate::id::new_id;
use chrono::Utc;
use tracing::debug;

impl RecipeDb {
    /// Fetch a user by ID
    pub fn get_user(&self, id: &str) -> Result<User> {
        User::find_by_id(&self.conn, id)?.ok_or_else(|| Error::NoSuchUser(id.to_string()))
    }

    /// Fetch a user by username, ignoring case
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        User::find_by_username(&self.conn, username)?
            .ok_or_else(|| Error::NoSuchUser(username.to_string()))
    }

    /// All users, oldest first
    pub fn get_users(&self) -> Result<Vec<User>> {
        User::list_all(&self.conn)
    }

    /// Register a new user
    ///
    /// Fails with `UserExists` if the username is taken in any case.
    pub fn new_user(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        bio_text: Option<&str>,
        profile_image: Option<&Image>,
    ) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidArgument("username must not be empty".to_string()));
        }
        if let Some(image) = profile_image {
            self.get_image(&image.id)?;
        }

        let user = User {
            id: new_id(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            bio_text: bio_text.map(String::from),
            date_joined: Utc::now(),
            profile_image_id: profile_image.map(|i| i.id.clone()),
            password_hash: auth::hash_password(password)?,
        };

        user.insert(&self.conn)
            .map_err(|e| exists_on_conflict(e, || Error::UserExists(username.to_string())))?;

        debug!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Check a password against the user's stored hash
    ///
    /// Reads the current hash from the store rather than the snapshot.
    pub fn check_password(&self, user: &User, password: &str) -> Result<bool> {
        let stored = self.get_user(&user.id)?;
        Ok(auth::verify_password(password, &stored.password_hash))
    }

    pub fn set_display_name(&self, user: &mut User, display_name: &str) -> Result<()> {
        user.update_display_name(&self.conn, display_name)?;
        debug!("Set display name of user {}", user.id);
        Ok(())
    }

    pub fn set_bio_text(&self, user: &mut User, bio_text: Option<&str>) -> Result<()> {
        user.update_bio_text(&self.conn, bio_text)?;
        debug!("Set bio text of user {}", user.id);
        Ok(())
    }

    pub fn set_profile_image(&self, user: &mut User, image: Option<&Image>) -> Result<()> {
        if let Some(image) = image {
            self.get_image(&image.id)?;
        }
        user.update_profile_image(&self.conn, image)?;
        debug!("Set profile image of user {}", user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, RecipeDb) {
        let temp_dir = tempfile::tempdir().unwrap();
        let rdb = RecipeDb::open_in_memory(temp_dir.path().join("images")).unwrap();
        (temp_dir, rdb)
    }

    #[test]
    fn test_new_user_round_trip() {
        let (_temp, rdb) = test_db();
        let user = rdb
            .new_user("angela", "Angela", "pw", Some("Sample bio"), None)
            .unwrap();

        let found = rdb.get_user(&user.id).unwrap();
        assert_eq!(found.username, "angela");
        assert_eq!(found.display_name, "Angela");
        assert_eq!(found.bio_text.as_deref(), Some("Sample bio"));
        assert_eq!(found.date_joined, user.date_joined);
        assert!(found.profile_image_id.is_none());

        assert_eq!(rdb.get_user_by_username("ANGELA").unwrap(), user);
    }

    #[test]
    fn test_duplicate_username_any_case() {
        let (_temp, rdb) = test_db();
        rdb.new_user("Angela", "Angela", "pw", None, None).unwrap();

        let err = rdb.new_user("aNGELA", "Other", "pw", None, None).unwrap_err();
        assert!(matches!(err, Error::UserExists(_)), "got {err:?}");
        assert_eq!(rdb.get_users().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_user() {
        let (_temp, rdb) = test_db();
        assert!(matches!(rdb.get_user("nope"), Err(Error::NoSuchUser(_))));
        assert!(matches!(rdb.get_user_by_username("nope"), Err(Error::NoSuchUser(_))));
    }

    #[test]
    fn test_check_password() {
        let (_temp, rdb) = test_db();
        let user = rdb.new_user("bob", "Bob", "correct horse", None, None).unwrap();

        assert!(rdb.check_password(&user, "correct horse").unwrap());
        assert!(!rdb.check_password(&user, "wrong").unwrap());
    }

    #[test]
    fn test_profile_edits() {
        let (_temp, rdb) = test_db();
        let mut user = rdb.new_user("caitlyn", "Caitlyn", "pw", None, None).unwrap();

        rdb.set_display_name(&mut user, "Cait").unwrap();
        rdb.set_bio_text(&mut user, Some("Baker")).unwrap();

        let found = rdb.get_user(&user.id).unwrap();
        assert_eq!(found.display_name, "Cait");
        assert_eq!(found.bio_text.as_deref(), Some("Baker"));

        let ghost = Image::new("000000000000".to_string(), "/nowhere.png".to_string());
        assert!(matches!(
            rdb.set_profile_image(&mut user, Some(&ghost)),
            Err(Error::NoSuchImage(_))
        ));
    }

    #[test]
    fn test_empty_username_rejected() {
        let (_temp, rdb) = test_db();
        assert!(matches!(
            rdb.new_user("  ", "Nobody", "pw", None, None),
            Err(Error::InvalidArgument(_))
        ));
    }
}
