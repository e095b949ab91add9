//! JSON-backed settings store.
//!
//! `JsonConfigStore` reads a flat JSON object from disk:
//!
//! ```json
//! { "server_name": "192.168.1.20", "port": "5155" }
//! ```
//!
//! The file is re-read on every lookup, so edits show up on the next report.
//! Numbers and booleans are returned in their JSON text form (`5155` reads as
//! `"5155"`); `null` counts as unset. A missing or unreadable file behaves as
//! an empty store and only logs a warning, because the reporter must keep going
//! with its defaults.
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::warn;
use serde_json::Value;

use crate::config::ConfigProvider;
use crate::errors::ConfigError;

pub struct JsonConfigStore {
    /// Path to the JSON settings file
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the whole file. Unlike [`ConfigProvider::get_string`] this reports
    /// I/O and parse errors, which is handy for validating a file up front.
    pub fn load(&self) -> Result<HashMap<String, String>, ConfigError> {
        let data = fs::read_to_string(&self.path)?;
        let parsed: HashMap<String, Value> = serde_json::from_str(&data)?;

        Ok(parsed
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::Null => None,
                Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect())
    }
}

impl ConfigProvider for JsonConfigStore {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                warn!("Settings file {} unusable, using defaults: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store_with(contents: &str) -> (tempfile::NamedTempFile, JsonConfigStore) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let store = JsonConfigStore::new(file.path().to_path_buf());
        (file, store)
    }

    #[test]
    fn reads_strings_and_numbers() {
        let (_file, store) = store_with(r#"{"server_name":"10.1.1.1","port":8080,"extra":null}"#);
        assert_eq!(store.get_string("server_name").as_deref(), Some("10.1.1.1"));
        assert_eq!(store.get_string("port").as_deref(), Some("8080"));
        assert!(store.get_string("extra").is_none());
        assert!(store.get_string("missing").is_none());
    }

    #[test]
    fn picks_up_changes_between_lookups() {
        let (file, store) = store_with(r#"{"port":"5155"}"#);
        assert_eq!(store.get_string("port").as_deref(), Some("5155"));

        fs::write(file.path(), r#"{"port":"6000"}"#).unwrap();
        assert_eq!(store.get_string("port").as_deref(), Some("6000"));
    }

    #[test]
    fn broken_file_behaves_as_empty() {
        let (_file, store) = store_with("{ not json");
        assert!(matches!(store.load(), Err(ConfigError::Parse(_))));
        assert!(store.get_string("port").is_none());

        let missing = JsonConfigStore::new(PathBuf::from("/nonexistent/ring-tracker.json"));
        assert!(matches!(missing.load(), Err(ConfigError::Io(_))));
        assert!(missing.get_string("port").is_none());
    }
}
