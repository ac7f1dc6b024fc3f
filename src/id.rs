// src/id.rs

//! Random identifiers for entities and session tokens

use rand::RngCore;

/// Length in hex characters of every entity identifier
pub const ID_LENGTH: usize = 12;

/// Generate a random lowercase hex string of exactly `length` characters
pub fn random_hex(length: usize) -> String {
    let mut bytes = vec![0u8; length.div_ceil(2)];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut token = hex::encode(bytes);
    token.truncate(length);
    token
}

/// Generate a new entity identifier
pub fn new_id() -> String {
    random_hex(ID_LENGTH)
}
