//! Directory tree snapshot and restore.
//!
//! Keys are file paths relative to the root, always `/`-separated so a
//! snapshot taken on one platform restores on another.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::{Reader, Writer};
use crate::error::{DepotError, Result};

/// Reads every regular file under a directory as `{relative/path: content}`
///
/// Symbolic links are followed; a link is keyed by its own path under the root.
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    root: PathBuf,
}

impl DirectoryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Reader<String> for DirectoryReader {
    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.root.is_dir() {
            return Err(DepotError::DirectoryDoesNotExist(self.root.clone()));
        }

        let mut mapping = BTreeMap::new();
        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_dir() {
                continue;
            }
            if !entry.file_type().is_file() {
                tracing::debug!(path = %entry.path().display(), "skipping non-regular file");
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| DepotError::IllegalState(e.to_string()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let bytes = fs::read(entry.path())?;
            let content = String::from_utf8(bytes).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not valid UTF-8: {}", entry.path().display(), e),
                )
            })?;

            mapping.insert(key, content);
        }

        tracing::debug!(root = %self.root.display(), files = mapping.len(), "read directory");
        Ok(mapping)
    }
}

/// Recreates files from a `{relative/path: content}` mapping under a target directory
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    target: PathBuf,
}

impl DirectoryWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Writer<String> for DirectoryWriter {
    /// Every key is validated before the first file is written
    fn write(&self, mapping: &BTreeMap<String, String>) -> Result<()> {
        if self.target.exists() && !self.target.is_dir() {
            return Err(DepotError::IllegalState(format!(
                "{} exists and is not a directory",
                self.target.display()
            )));
        }

        for key in mapping.keys() {
            check_relative(key)?;
        }

        fs::create_dir_all(&self.target)?;
        for (key, content) in mapping {
            let path = self.target.join(key);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            tracing::trace!(path = %path.display(), "restored file");
        }

        tracing::debug!(dir = %self.target.display(), files = mapping.len(), "restored directory");
        Ok(())
    }
}

/// Keys must stay inside the target: relative, no `..`, no root
fn check_relative(key: &str) -> Result<()> {
    let path = Path::new(key);
    let escapes = key.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if escapes {
        return Err(DepotError::IllegalParameter(format!(
            "'{}' is not a relative path inside the target directory",
            key
        )));
    }
    Ok(())
}
