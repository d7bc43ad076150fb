//! Reads a single text file as a one-entry mapping.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Reader;
use crate::error::{DepotError, Result};

/// Reads `path` into `{file_name: content}`
#[derive(Debug, Clone)]
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Reader<String> for FileReader {
    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.is_file() {
            return Err(DepotError::FileDoesNotExist(self.path.clone()));
        }

        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DepotError::IllegalParameter(format!(
                "{} has no file name",
                self.path.display()
            )))?;
        let content = fs::read_to_string(&self.path)?;

        let mut mapping = BTreeMap::new();
        mapping.insert(name, content);
        Ok(mapping)
    }
}
