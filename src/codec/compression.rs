//! zstd compression for depot payloads and chunk sets.

use crate::error::{DepotError, Result};

/// Compress a buffer into a single zstd frame
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    zstd::encode_all(data, level).map_err(DepotError::Compression)
}

/// Decompress a buffer holding one or more zstd frames
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data).map_err(DepotError::Compression)
}
