// src/session.rs

//! Login session store
//!
//! Maps opaque session tokens to user ids. One store is created at process
//! start and handed to whatever serves requests; entries expire after a
//! fixed age and are dropped on the next lookup or purge.

use crate::db::models::User;
use crate::id::random_hex;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Length in hex characters of a session token
pub const TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: String,
    created_at: DateTime<Utc>,
}

/// Token -> user id map with a fixed maximum age
#[derive(Debug)]
pub struct SessionStore {
    max_age: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    /// Create an empty store whose entries live for `max_age`
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a store from the configured maximum age in seconds
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.session.max_age())
    }

    /// Start a session for `user` and return its token
    pub fn create(&self, user: &User) -> String {
        self.create_at(user, Utc::now())
    }

    fn create_at(&self, user: &User, now: DateTime<Utc>) -> String {
        let token = random_hex(TOKEN_LENGTH);
        self.sessions.lock().insert(
            token.clone(),
            SessionEntry {
                user_id: user.id.clone(),
                created_at: now,
            },
        );
        debug!("Created session for user {}", user.id);
        token
    }

    /// Look up the user id for `token`, dropping it if expired
    pub fn get(&self, token: &str) -> Option<String> {
        self.get_at(token, Utc::now())
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.get(token)?;
        if now - entry.created_at > self.max_age {
            sessions.remove(token);
            return None;
        }
        Some(entry.user_id.clone())
    }

    /// End a session; returns whether it existed
    pub fn remove(&self, token: &str) -> bool {
        self.sessions.lock().remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.created_at <= self.max_age);
        before - sessions.len()
    }

    /// Number of sessions currently held, expired or not
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
