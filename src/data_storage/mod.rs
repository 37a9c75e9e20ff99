/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Key-value storage backing the bookmark list.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StorageError;

pub mod bookmarks;
#[cfg(not(target_arch = "wasm32"))]
pub mod database;

#[cfg(not(target_arch = "wasm32"))]
pub use database::BlogDataConnection;

/// String-keyed, string-valued storage in the shape of the browser's
/// `localStorage`. Calls are synchronous and happen on a single thread.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. With a quota it rejects writes the way a full browser
/// storage area does; the quota counts the UTF-8 bytes of all keys and values.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RefCell::default(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn memory_storage_quota() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "1234567").unwrap();
        // Replacing a value only counts the new value.
        storage.set_item("k", "7654321").unwrap();
        let err = storage.set_item("k", "12345678").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 9,
                quota: 8
            }
        ));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("7654321"));
    }
}
