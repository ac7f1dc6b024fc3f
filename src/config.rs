// src/config.rs

//! Configuration store
//!
//! The configuration lives in a JSON document next to the database. On
//! load, every key present in the defaults but missing from the stored
//! document (at any depth) is filled in, stored values always win, and the
//! file is rewritten with sorted keys whenever something had to be added.
//! Keys the defaults do not know about are kept as-is.

use crate::error::{Error, Result};
use chrono::TimeDelta;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Largest accepted `file_read_chunk`, in bytes
pub const MAX_READ_CHUNK: u64 = 8 << 20;

/// Default configuration document
pub fn default_document() -> Value {
    json!({
        "log_level": "INFO",
        "file_read_chunk": 1_048_576,
        "session": {
            "max_age_seconds": 604_800,
        },
    })
}

/// Load the configuration at `path`, merging in `defaults`
///
/// A missing or empty file is replaced by `defaults` verbatim.
pub fn load(path: &Path, defaults: &Value) -> Result<Value> {
    let stored_exists = fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false);

    if !stored_exists {
        debug!("Writing default configuration to {}", path.display());
        write(path, defaults)?;
        return Ok(defaults.clone());
    }

    let mut document: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    if merge_missing(&mut document, defaults) {
        debug!("Configuration at {} was incomplete, rewriting", path.display());
        write(path, &document)?;
    }

    Ok(document)
}

/// Insert every key of `defaults` that `target` lacks, recursing into objects
///
/// Returns true if anything was inserted. Existing values are never
/// replaced, even when their type differs from the default.
pub fn merge_missing(target: &mut Value, defaults: &Value) -> bool {
    let (Value::Object(target), Value::Object(defaults)) = (target, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default) in defaults {
        match target.get_mut(key) {
            Some(existing) => changed |= merge_missing(existing, default),
            None => {
                target.insert(key.clone(), default.clone());
                changed = true;
            }
        }
    }
    changed
}

fn write(path: &Path, document: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    // serde_json's Map is ordered by key, which keeps the file stable
    fs::write(path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}

/// Typed view over the recognized configuration options
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_file_read_chunk")]
    pub file_read_chunk: u64,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: i64,
}

impl SessionConfig {
    /// Session lifetime; out-of-range values fall back to the default
    pub fn max_age(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.max_age_seconds)
            .filter(|age| *age > TimeDelta::zero())
            .unwrap_or_else(|| TimeDelta::seconds(default_max_age_seconds()))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            file_read_chunk: default_file_read_chunk(),
            session: SessionConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_file_read_chunk() -> u64 {
    1_048_576
}

fn default_max_age_seconds() -> i64 {
    7 * 24 * 60 * 60
}

impl Config {
    /// Extract the typed view from a merged document
    ///
    /// `file_read_chunk` must lie in `1..=MAX_READ_CHUNK` and
    /// `session.max_age_seconds` must be a positive, representable duration.
    pub fn from_document(document: &Value) -> Result<Self> {
        let config = Config::deserialize(document)?;

        if config.file_read_chunk == 0 || config.file_read_chunk > MAX_READ_CHUNK {
            return Err(Error::InvalidArgument(format!(
                "file_read_chunk must be between 1 and {MAX_READ_CHUNK}, got {}",
                config.file_read_chunk
            )));
        }
        let max_age = config.session.max_age_seconds;
        if max_age <= 0 || TimeDelta::try_seconds(max_age).is_none() {
            return Err(Error::InvalidArgument(format!(
                "session.max_age_seconds out of range: {max_age}"
            )));
        }

        Ok(config)
    }

    /// Map `log_level` onto a `tracing` filter directive
    ///
    /// Accepts the usual level names case-insensitively, including
    /// `WARNING` and `CRITICAL`. Unrecognized values fall back to `info`.
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.to_ascii_uppercase().as_str() {
            "TRACE" => "trace",
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" | "WARNING" => "warn",
            "ERROR" | "CRITICAL" => "error",
            other => {
                warn!("Unrecognized log_level {:?}, using INFO", other);
                "info"
            }
        }
    }
}
