//! Plain JSON file reader and writer.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{Reader, Writer};
use crate::error::{DepotError, Result};

/// Reads a JSON object file as a mapping
#[derive(Debug, Clone)]
pub struct JsonReader {
    path: PathBuf,
}

impl JsonReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: DeserializeOwned> Reader<T> for JsonReader {
    fn read(&self) -> Result<BTreeMap<String, T>> {
        if !self.path.is_file() {
            return Err(DepotError::FileDoesNotExist(self.path.clone()));
        }

        let bytes = fs::read(&self.path)?;
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| DepotError::Serialization(e.to_string()))?;
        object_to_mapping(value)
    }
}

/// Writes a mapping as a pretty-printed JSON object
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize> Writer<T> for JsonWriter {
    fn write(&self, mapping: &BTreeMap<String, T>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(mapping)
            .map_err(|e| DepotError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, bytes)?;

        tracing::debug!(path = %self.path.display(), entries = mapping.len(), "wrote json");
        Ok(())
    }
}

/// Convert a JSON value that must be an object into a typed mapping
pub(super) fn object_to_mapping<T: DeserializeOwned>(value: Value) -> Result<BTreeMap<String, T>> {
    match value {
        Value::Object(object) => object
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map(|value| (key, value))
                    .map_err(|e| DepotError::Serialization(e.to_string()))
            })
            .collect(),
        other => Err(DepotError::IllegalParameter(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
