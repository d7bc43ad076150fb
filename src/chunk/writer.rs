//! Chunk Writer
//!
//! Compresses a buffer and writes it as a numbered chunk set.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{chunk_path, chunk_ranges, timestamp_name, ChunkInfo, ChunkOptions, ChunkPolicy, ChunkSetInfo};
use crate::codec::Format;
use crate::error::Result;

/// Writes one buffer as a chunk set under a base directory
///
/// Options are validated at construction, so an invalid policy fails before
/// any file is touched. Each chunk is an independent overwrite: there is no
/// atomicity across files.
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    /// Directory holding the chunk files
    base_path: PathBuf,
    /// Resolved chunk set name
    chunk_name: String,
    policy: ChunkPolicy,
    /// Pipeline supplying the compression level
    format: Format,
}

impl ChunkWriter {
    /// Create a writer with the default format
    pub fn new(base_path: impl Into<PathBuf>, options: ChunkOptions) -> Result<Self> {
        Self::with_format(base_path, options, Format::default())
    }

    /// Create a writer that compresses with `format`
    pub fn with_format(
        base_path: impl Into<PathBuf>,
        options: ChunkOptions,
        format: Format,
    ) -> Result<Self> {
        let policy = options.policy()?;
        let chunk_name = options.chunk_name.unwrap_or_else(timestamp_name);

        Ok(Self {
            base_path: base_path.into(),
            chunk_name,
            policy,
            format,
        })
    }

    /// Compress `buffer` and write it as chunks `0..n`
    ///
    /// Creates the base directory if needed and overwrites existing chunk
    /// files with the same name.
    pub fn write(&self, buffer: &[u8]) -> Result<ChunkSetInfo> {
        let compressed = Bytes::from(self.format.compress(buffer)?);
        fs::create_dir_all(&self.base_path)?;

        let ranges = chunk_ranges(compressed.len(), self.policy);
        let mut chunks = Vec::with_capacity(ranges.len());

        for (index, range) in ranges.into_iter().enumerate() {
            let chunk = compressed.slice(range);
            let path = self.chunk_path(index);
            fs::write(&path, &chunk)?;

            tracing::trace!(path = %path.display(), size = chunk.len(), "wrote chunk");
            chunks.push(ChunkInfo {
                index,
                path,
                size: chunk.len() as u64,
                crc32: crc32fast::hash(&chunk),
            });
        }

        // Leftovers from an earlier, longer write would be read back as part of this set
        let next = self.chunk_path(chunks.len());
        if next.exists() {
            tracing::warn!(
                path = %next.display(),
                "stale chunk follows the written set and will corrupt reads"
            );
        }

        tracing::debug!(
            name = %self.chunk_name,
            chunks = chunks.len(),
            input_bytes = buffer.len(),
            stored_bytes = compressed.len(),
            "wrote chunk set"
        );

        Ok(ChunkSetInfo {
            name: self.chunk_name.clone(),
            chunks,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the resolved chunk set name
    pub fn chunk_name(&self) -> &str {
        &self.chunk_name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn policy(&self) -> ChunkPolicy {
        self.policy
    }

    fn chunk_path(&self, index: usize) -> PathBuf {
        chunk_path(&self.base_path, &self.chunk_name, index)
    }
}
