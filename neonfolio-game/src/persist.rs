//! Key/value persistence for the small JSON blobs the core owns.
//!
//! Hosts supply a [`ProfileStorage`] (browser local storage, a directory of
//! files, an in-memory map). Typed helpers here turn unreadable blobs into
//! defaults so a corrupted key never blocks a session.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

/// Trait for abstracting save/load of raw JSON blobs.
/// Platform-specific implementations should provide this.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error>;

    /// Delete the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Load and decode `key`, substituting `T::default()` when absent or malformed.
///
/// # Errors
///
/// Returns an error only when the storage itself fails.
pub fn load_or_default<S, T>(storage: &S, key: &str) -> Result<T, S::Error>
where
    S: ProfileStorage + ?Sized,
    T: DeserializeOwned + Default,
{
    Ok(load_opt(storage, key)?.unwrap_or_default())
}

/// Load and decode `key`; malformed blobs are logged and treated as absent.
///
/// # Errors
///
/// Returns an error only when the storage itself fails.
pub fn load_opt<S, T>(storage: &S, key: &str) -> Result<Option<T>, S::Error>
where
    S: ProfileStorage + ?Sized,
    T: DeserializeOwned,
{
    let Some(blob) = storage.load_blob(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&blob) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            log::warn!("discarding malformed blob under {key}: {err}");
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if the storage rejects the write.
pub fn save<S, T>(storage: &S, key: &str, value: &T) -> Result<(), S::Error>
where
    S: ProfileStorage + ?Sized,
    T: Serialize + ?Sized,
{
    // Plain data types only; serialization of these cannot fail.
    let blob = serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to encode {key}: {err}");
        String::from("null")
    });
    storage.save_blob(key, &blob)
}

/// In-memory storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a stored blob.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl ProfileStorage for MemoryStorage {
    type Error = Infallible;

    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn malformed_blob_falls_back_to_default() {
        let storage = MemoryStorage::new();
        storage.save_blob("k", "{not json").unwrap();
        let value: BTreeMap<String, u32> = load_or_default(&storage, "k").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn saves_are_visible_through_clones() {
        let storage = MemoryStorage::new();
        let view = storage.clone();
        save(&storage, "flag", &true).unwrap();
        assert_eq!(view.raw("flag").as_deref(), Some("true"));
        let flag: Option<bool> = load_opt(&view, "flag").unwrap();
        assert_eq!(flag, Some(true));
        view.remove("flag").unwrap();
        assert!(storage.is_empty());
    }
}
