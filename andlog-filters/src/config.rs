//! Persisted settings.
//!
//! The engine does not know where settings live: an embedding application
//! provides a [`ConfigStorage`] and the engine reads and writes typed values
//! through [`Preference`].

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// key/value store of JSON-encoded settings
pub trait ConfigStorage {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryConfigStorage {
    values: RefCell<HashMap<String, String>>,
}

impl InMemoryConfigStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// raw stored text of `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl ConfigStorage for InMemoryConfigStorage {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view of one storage key.
pub struct Preference<T> {
    storage: Rc<dyn ConfigStorage>,
    key: &'static str,
    default: fn() -> T,
}

impl<T: Serialize + DeserializeOwned> Preference<T> {
    pub fn new(storage: Rc<dyn ConfigStorage>, key: &'static str, default: fn() -> T) -> Self {
        Self { storage, key, default }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// stored value, or the default when it is missing or unreadable
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(Some(value)) => value,
            Ok(None) => (self.default)(),
            Err(e) => {
                log::warn!("falling back to default for '{}': {:#}", self.key, e);
                (self.default)()
            }
        }
    }

    pub fn try_get(&self) -> anyhow::Result<Option<T>> {
        let Some(raw) = self.storage.load(self.key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("malformed value of '{}'", self.key))?;
        Ok(Some(value))
    }

    /// stores `value`; a failed write is logged and otherwise ignored
    pub fn set(&self, value: &T) {
        if let Err(e) = self.try_set(value) {
            log::error!("failed to save '{}': {:#}", self.key, e);
        }
    }

    pub fn try_set(&self, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("cannot encode value of '{}'", self.key))?;
        self.storage.save(self.key, &raw)
    }
}
