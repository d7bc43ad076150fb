//! Depot implementation
//!
//! BTreeMap-backed store with an explicit lifecycle.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Lifecycle;
use crate::codec::Format;
use crate::error::{DepotError, Result};

/// In-memory key→value store
///
/// Every method except construction checks the lifecycle first and fails
/// with [`DepotError::NullDepot`] once the depot has been destroyed.
#[derive(Debug, Clone)]
pub struct Depot<T = serde_json::Value> {
    /// Current mapping, or the terminal destroyed state
    state: Lifecycle<T>,

    /// Pipeline used for the encodability check and (de)serialization
    format: Format,
}

impl<T> Depot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create a new empty Depot using the default format
    pub fn new() -> Self {
        Self::with_format(Format::default())
    }

    /// Create a new empty Depot using the given format
    pub fn with_format(format: Format) -> Self {
        Self {
            state: Lifecycle::default(),
            format,
        }
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Insert a new item
    ///
    /// Fails with `KeyConflict` if the key is present and `ValueMalformed`
    /// if the value cannot be encoded by the active codec.
    pub fn set_item(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        let key = key.into();
        let format = self.format;
        let entries = self.entries_mut()?;

        if entries.contains_key(&key) {
            return Err(DepotError::KeyConflict(key));
        }
        check_value(&format, &key, &value)?;

        tracing::trace!(key = %key, "set item");
        entries.insert(key, value);
        Ok(())
    }

    /// Get the value stored under `key`
    pub fn get_item(&self, key: &str) -> Result<&T> {
        self.entries()?
            .get(key)
            .ok_or_else(|| DepotError::KeyNotFound(key.to_string()))
    }

    /// Overwrite an existing item
    pub fn update_item(&mut self, key: &str, value: T) -> Result<()> {
        let format = self.format;
        let entries = self.entries_mut()?;

        let slot = entries
            .get_mut(key)
            .ok_or_else(|| DepotError::KeyNotFound(key.to_string()))?;
        check_value(&format, key, &value)?;

        tracing::trace!(key = %key, "update item");
        *slot = value;
        Ok(())
    }

    /// Remove an item, returning its value
    pub fn remove_item(&mut self, key: &str) -> Result<T> {
        let removed = self
            .entries_mut()?
            .remove(key)
            .ok_or_else(|| DepotError::KeyNotFound(key.to_string()))?;

        tracing::trace!(key = %key, "remove item");
        Ok(removed)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.entries()?.contains_key(key))
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Result<Vec<&str>> {
        Ok(self.entries()?.keys().map(String::as_str).collect())
    }

    /// Get entry count
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries()?.is_empty())
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Copy of the full mapping
    pub fn export(&self) -> Result<BTreeMap<String, T>> {
        Ok(self.entries()?.clone())
    }

    /// Replace the whole mapping
    ///
    /// Values are trusted: no per-item encodability check is made.
    pub fn load(&mut self, mapping: BTreeMap<String, T>) -> Result<()> {
        let entries = self.entries_mut()?;
        tracing::debug!(entries = mapping.len(), "load depot");
        *entries = mapping;
        Ok(())
    }

    /// Encode, compress and (if `key` is given) encrypt the full mapping
    pub fn serialize(&self, key: Option<&str>) -> Result<Bytes> {
        let entries = self.entries()?;
        let sealed = self.format.seal(entries, key)?;

        tracing::debug!(
            entries = entries.len(),
            bytes = sealed.len(),
            encrypted = key.is_some(),
            "serialized depot"
        );
        Ok(Bytes::from(sealed))
    }

    /// Inverse of [`Depot::serialize`]; replaces the mapping on success
    ///
    /// On failure the current mapping is left untouched.
    pub fn deserialize(&mut self, buffer: &[u8], key: Option<&str>) -> Result<()> {
        self.entries()?;
        let mapping: BTreeMap<String, T> = self.format.open(buffer, key)?;
        self.load(mapping)
    }

    /// Empty the mapping; the depot stays usable
    pub fn clear(&mut self) -> Result<()> {
        self.entries_mut()?.clear();
        tracing::debug!("cleared depot");
        Ok(())
    }

    /// Permanently invalidate this depot
    pub fn destroy(&mut self) -> Result<()> {
        self.entries()?;
        self.state = Lifecycle::Destroyed;
        tracing::debug!("destroyed depot");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, Lifecycle::Destroyed)
    }

    /// Get the format used by this depot
    pub fn format(&self) -> Format {
        self.format
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn entries(&self) -> Result<&BTreeMap<String, T>> {
        match &self.state {
            Lifecycle::Alive(entries) => Ok(entries),
            Lifecycle::Destroyed => Err(DepotError::NullDepot),
        }
    }

    fn entries_mut(&mut self) -> Result<&mut BTreeMap<String, T>> {
        match &mut self.state {
            Lifecycle::Alive(entries) => Ok(entries),
            Lifecycle::Destroyed => Err(DepotError::NullDepot),
        }
    }
}

impl<T> Default for Depot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Reject values that do not survive a round trip through the active codec
///
/// JSON writes non-finite floats as `null`, so encoding alone is not enough.
fn check_value<T>(format: &Format, key: &str, value: &T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let malformed = |e: DepotError| match e {
        DepotError::Serialization(reason) => DepotError::ValueMalformed {
            key: key.to_string(),
            reason,
        },
        other => other,
    };

    let encoded = format.codec.encode(value).map_err(malformed)?;
    format
        .codec
        .decode::<T>(&encoded)
        .map(|_| ())
        .map_err(malformed)
}
