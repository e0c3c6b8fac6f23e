//! Store configuration.
//!
//! # Responsibility
//! - Resolve where the note file lives and how writes are batched.
//! - Keep ambient lookups (environment) at the edge; the store itself only
//!   receives an explicit `StoreConfig`.
//!
//! # Invariants
//! - `data_dir` is never empty.
//! - `file_name` is a bare file name without path separators.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "NOTEPAD_DATA_DIR";
pub const WRITE_DEBOUNCE_ENV: &str = "NOTEPAD_WRITE_DEBOUNCE_MS";
pub const DEFAULT_FILE_NAME: &str = "notes.json";
pub const DEFAULT_WRITE_DEBOUNCE_MS: u64 = 200;
const FALLBACK_DIR_NAME: &str = "notepad";

/// Invalid store configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataDir,
    InvalidFileName(String),
    InvalidDebounce(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data_dir cannot be empty"),
            Self::InvalidFileName(value) => {
                write!(f, "file name must be a bare file name, got `{value}`")
            }
            Self::InvalidDebounce(value) => write!(
                f,
                "{WRITE_DEBOUNCE_ENV} must be a non-negative integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved location and write policy for one note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// Window during which consecutive snapshots collapse into one write.
    pub write_debounce: Duration,
}

impl StoreConfig {
    /// Config rooted at `data_dir` with default file name and debounce.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        if data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(Self {
            data_dir,
            file_name: DEFAULT_FILE_NAME.to_string(),
            write_debounce: Duration::from_millis(DEFAULT_WRITE_DEBOUNCE_MS),
        })
    }

    /// Resolves config from `NOTEPAD_DATA_DIR` and `NOTEPAD_WRITE_DEBOUNCE_MS`.
    ///
    /// Falls back to `<temp>/notepad` when no data directory is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup(DATA_DIR_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(FALLBACK_DIR_NAME));

        let mut config = Self::new(data_dir)?;
        if let Some(raw) = lookup(WRITE_DEBOUNCE_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let millis = trimmed
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidDebounce(trimmed.to_string()))?;
                config.write_debounce = Duration::from_millis(millis);
            }
        }
        Ok(config)
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Result<Self, ConfigError> {
        let file_name = file_name.into();
        let is_bare = !file_name.is_empty()
            && Path::new(&file_name).file_name().map(|name| name == file_name.as_str())
                == Some(true);
        if !is_bare {
            return Err(ConfigError::InvalidFileName(file_name));
        }
        self.file_name = file_name;
        Ok(self)
    }

    pub fn with_write_debounce(mut self, debounce: Duration) -> Self {
        self.write_debounce = debounce;
        self
    }

    /// Full path of the note file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DATA_DIR_ENV, DEFAULT_FILE_NAME, WRITE_DEBOUNCE_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_rejects_empty_dir() {
        assert_eq!(StoreConfig::new(""), Err(ConfigError::EmptyDataDir));
    }

    #[test]
    fn store_path_joins_dir_and_file_name() {
        let config = StoreConfig::new("/data/app").unwrap();
        assert_eq!(
            config.store_path(),
            PathBuf::from("/data/app").join(DEFAULT_FILE_NAME)
        );
    }

    #[test]
    fn lookup_reads_dir_and_debounce() {
        let config = StoreConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, " /srv/notes "),
            (WRITE_DEBOUNCE_ENV, "0"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.write_debounce, Duration::ZERO);
    }

    #[test]
    fn lookup_falls_back_to_temp_dir() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.data_dir.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn lookup_rejects_bad_debounce() {
        let err = StoreConfig::from_lookup(lookup(&[(WRITE_DEBOUNCE_ENV, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDebounce("soon".to_string()));
    }

    #[test]
    fn file_name_must_be_bare() {
        let config = StoreConfig::new("/data").unwrap();
        assert!(config.clone().with_file_name("notes-v2.json").is_ok());
        assert!(config.with_file_name("../escape.json").is_err());
    }
}
