//! Chunk Reader
//!
//! Discovers a chunk set by sequential probing and reassembles it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{chunk_path, ChunkInfo, ChunkSetInfo};
use crate::codec::Format;
use crate::error::{DepotError, Result};
use crate::io::Reader;

/// Reader for the chunk set `(base_path, chunk_name)`
///
/// Discovery probes `{name}-0`, `{name}-1`, … and stops at the first missing
/// index. A missing chunk 0 is an error; a gap further on silently truncates.
#[derive(Debug, Clone)]
pub struct ChunkReader {
    base_path: PathBuf,
    chunk_name: String,
    /// Must match the format the set was written with
    format: Format,
    /// Passphrase used by the [`Reader`] impl
    key: Option<String>,
}

impl ChunkReader {
    /// Create a reader with the default format
    pub fn new(base_path: impl Into<PathBuf>, chunk_name: impl Into<String>) -> Self {
        Self::with_format(base_path, chunk_name, Format::default())
    }

    pub fn with_format(
        base_path: impl Into<PathBuf>,
        chunk_name: impl Into<String>,
        format: Format,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            chunk_name: chunk_name.into(),
            format,
            key: None,
        }
    }

    /// Passphrase to use when read through the [`Reader`] trait
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Check whether chunk 0 exists
    pub fn exists(&self) -> bool {
        chunk_path(&self.base_path, &self.chunk_name, 0).is_file()
    }

    /// Concatenation of all chunk files in index order, as stored
    pub fn read_raw(&self) -> Result<Vec<u8>> {
        let paths = self.discover()?;

        let mut buffer = Vec::new();
        for path in &paths {
            let chunk = fs::read(path)?;
            tracing::trace!(path = %path.display(), size = chunk.len(), "read chunk");
            buffer.extend_from_slice(&chunk);
        }

        tracing::debug!(
            name = %self.chunk_name,
            chunks = paths.len(),
            stored_bytes = buffer.len(),
            "reassembled chunk set"
        );
        Ok(buffer)
    }

    /// Reassembled and decompressed buffer
    ///
    /// This is exactly the buffer that was handed to `ChunkWriter::write`.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        self.format.decompress(&self.read_raw()?)
    }

    /// Reassemble, decompress, decrypt (if `key` is given) and decode the mapping
    pub fn read<T: DeserializeOwned>(&self, key: Option<&str>) -> Result<BTreeMap<String, T>> {
        self.format.open(&self.read_bytes()?, key)
    }

    /// Per-chunk sizes and checksums, without decoding anything
    pub fn inspect(&self) -> Result<ChunkSetInfo> {
        let mut chunks = Vec::new();
        for (index, path) in self.discover()?.into_iter().enumerate() {
            let bytes = fs::read(&path)?;
            chunks.push(ChunkInfo {
                index,
                size: bytes.len() as u64,
                crc32: crc32fast::hash(&bytes),
                path,
            });
        }

        Ok(ChunkSetInfo {
            name: self.chunk_name.clone(),
            chunks,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the chunk set name
    pub fn chunk_name(&self) -> &str {
        &self.chunk_name
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Paths of chunks `0..n` where `n` is the first missing index
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        loop {
            let path = chunk_path(&self.base_path, &self.chunk_name, paths.len());
            if !path.is_file() {
                break;
            }
            paths.push(path);
        }

        if paths.is_empty() {
            return Err(DepotError::ChunkDoesNotExist(self.chunk_name.clone()));
        }
        Ok(paths)
    }
}

impl<T: DeserializeOwned> Reader<T> for ChunkReader {
    fn read(&self) -> Result<BTreeMap<String, T>> {
        ChunkReader::read(self, self.key.as_deref())
    }
}
