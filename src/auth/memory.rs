//! In-process storage backends.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::backend::{KeyValueStore, SecureKeyValueStore};
use super::error::AuthError;

/// A value held by a plain key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlainValue {
    Int(i64),
    Text(String),
}

impl PlainValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Secure store kept in memory. Useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySecureStore {
    items: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecureKeyValueStore for MemorySecureStore {
    fn set_item(&self, service: &str, account: &str, data: &[u8]) -> Result<(), AuthError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((service.to_string(), account.to_string()), data.to_vec());
        Ok(())
    }

    fn get_item(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, AuthError> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn delete_item(&self, service: &str, account: &str) -> Result<(), AuthError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}

/// Plain key-value store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<BTreeMap<String, PlainValue>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn put(&self, key: &str, value: PlainValue) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn value(&self, key: &str) -> Option<PlainValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn set_int(&self, key: &str, value: i64) -> Result<(), AuthError> {
        self.put(key, PlainValue::Int(value));
        Ok(())
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.value(key)?.as_int()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.put(key, PlainValue::Text(value.to_string()));
        Ok(())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.value(key).map(|value| value.as_text())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
