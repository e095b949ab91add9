use std::collections::HashMap;
use std::sync::RwLock;
use crate::config::ConfigProvider;

/// In‑memory settings (no persistence). Used as a default when the host supplies no store.
#[derive(Default)]
pub struct InMemoryConfig {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Ok(mut guard) = self.values.write() {
            guard.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut guard) = self.values.write() {
            guard.remove(key);
        }
    }
}

impl ConfigProvider for InMemoryConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}
