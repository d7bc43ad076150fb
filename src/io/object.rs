//! Reads an in-memory serializable object as a mapping.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::json::object_to_mapping;
use super::Reader;
use crate::error::{DepotError, Result};

/// Deep-copies any value that serializes to a JSON object
///
/// The mapping shares nothing with the source object.
#[derive(Debug)]
pub struct ObjectReader<'a, S: ?Sized> {
    object: &'a S,
}

impl<'a, S: Serialize + ?Sized> ObjectReader<'a, S> {
    pub fn new(object: &'a S) -> Self {
        Self { object }
    }

    /// Deep copy of the whole object as a single value of type `T`
    pub fn read_value<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(self.object)
            .map_err(|e| DepotError::Serialization(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| DepotError::Serialization(e.to_string()))
    }
}

impl<'a, S, T> Reader<T> for ObjectReader<'a, S>
where
    S: Serialize + ?Sized,
    T: DeserializeOwned,
{
    fn read(&self) -> Result<BTreeMap<String, T>> {
        let value = serde_json::to_value(self.object)
            .map_err(|e| DepotError::Serialization(e.to_string()))?;
        object_to_mapping(value)
    }
}
