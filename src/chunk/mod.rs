//! Chunk Module
//!
//! Persists one byte buffer as a numbered set of chunk files.
//!
//! ## File Layout
//! ```text
//! {base}/
//!   ├── {name}-0.bdc     bytes [0, s)
//!   ├── {name}-1.bdc     bytes [s, 2s)
//!   └── {name}-2.bdc     bytes [2s, len)
//! ```
//!
//! Each file is a raw slice of `compress(payload)`: no header, no magic, no
//! version. Only the concatenation of all chunks in index order is
//! meaningful. Indices are contiguous from 0; the reader stops probing at
//! the first missing index.

mod reader;
mod writer;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{DepotError, Result};

pub use reader::ChunkReader;
pub use writer::ChunkWriter;

// =============================================================================
// Shared Constants
// =============================================================================

/// Extension of every chunk file
pub const CHUNK_EXTENSION: &str = "bdc";

// =============================================================================
// Chunking Policy
// =============================================================================

/// How a buffer is split into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// One chunk holding the whole buffer
    Single,

    /// At most `n` bytes per chunk; the last chunk may be shorter
    MaxSize(usize),

    /// Exactly `n` chunks of `ceil(len / n)` bytes; trailing chunks may be short or empty
    MaxCount(usize),
}

/// Caller-facing chunk options
///
/// `max_chunk_size` and `max_chunk_count` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Name of the chunk set; a unix-millis timestamp when absent
    pub chunk_name: Option<String>,
    pub max_chunk_size: Option<usize>,
    pub max_chunk_count: Option<usize>,
}

impl ChunkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk_name = Some(name.into());
        self
    }

    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = Some(size);
        self
    }

    pub fn max_chunk_count(mut self, count: usize) -> Self {
        self.max_chunk_count = Some(count);
        self
    }

    /// Validate the limits and turn them into a policy
    pub fn policy(&self) -> Result<ChunkPolicy> {
        match (self.max_chunk_size, self.max_chunk_count) {
            (Some(_), Some(_)) => Err(DepotError::IllegalParameter(
                "You can only specify either max_chunk_size or max_chunk_count".to_string(),
            )),
            (Some(0), None) => Err(DepotError::IllegalParameter(
                "max_chunk_size must be greater than zero".to_string(),
            )),
            (None, Some(0)) => Err(DepotError::IllegalParameter(
                "max_chunk_count must be greater than zero".to_string(),
            )),
            (Some(size), None) => Ok(ChunkPolicy::MaxSize(size)),
            (None, Some(count)) => Ok(ChunkPolicy::MaxCount(count)),
            (None, None) => Ok(ChunkPolicy::Single),
        }
    }
}

/// Byte ranges of each chunk for a buffer of `len` bytes
///
/// `MaxSize` always yields at least one range so that an empty buffer still
/// produces chunk 0.
pub fn chunk_ranges(len: usize, policy: ChunkPolicy) -> Vec<Range<usize>> {
    match policy {
        ChunkPolicy::Single => vec![0..len],
        ChunkPolicy::MaxSize(size) => {
            let count = len.div_ceil(size).max(1);
            (0..count).map(|i| slice_range(i, size, len)).collect()
        }
        ChunkPolicy::MaxCount(count) => {
            let size = len.div_ceil(count);
            (0..count).map(|i| slice_range(i, size, len)).collect()
        }
    }
}

fn slice_range(index: usize, size: usize, len: usize) -> Range<usize> {
    let start = index.saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

// =============================================================================
// Naming
// =============================================================================

/// Path of chunk `index` of set `name` under `base`
pub fn chunk_path(base: &Path, name: &str, index: usize) -> PathBuf {
    base.join(format!("{}-{}.{}", name, index, CHUNK_EXTENSION))
}

/// Fresh time-derived chunk set name
pub(crate) fn timestamp_name() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Chunk Set Metadata
// =============================================================================

/// One chunk file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub index: usize,
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// CRC32 of the chunk bytes
    pub crc32: u32,
}

/// A written or discovered chunk set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSetInfo {
    pub name: String,
    /// Chunks in index order
    pub chunks: Vec<ChunkInfo>,
}

impl ChunkSetInfo {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Sum of all chunk sizes (the stored, compressed length)
    pub fn total_size(&self) -> u64 {
        self.chunks.iter().map(|c| c.size).sum()
    }

    /// Chunk sizes in index order
    pub fn sizes(&self) -> Vec<u64> {
        self.chunks.iter().map(|c| c.size).collect()
    }
}
