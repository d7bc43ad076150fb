//! Format pipeline: codec + compression + optional cipher.

use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{cipher, compression, Codec};
use crate::error::Result;

/// How a mapping is turned into stored bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Serialization codec
    pub codec: Codec,
    /// zstd compression level
    pub compression_level: i32,
    /// PBKDF2 iterations for passphrase keys
    pub kdf_iterations: NonZeroU32,
}

impl Format {
    /// zstd's own default level
    pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

    /// PBKDF2-HMAC-SHA256 work factor
    pub const DEFAULT_KDF_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
        Some(n) => n,
        None => panic!("iteration count must be non-zero"),
    };

    /// Same pipeline, different codec
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Encode → compress → encrypt (if `key` is given)
    pub fn seal<S: Serialize + ?Sized>(&self, value: &S, key: Option<&str>) -> Result<Vec<u8>> {
        let encoded = self.codec.encode(value)?;
        let compressed = self.compress(&encoded)?;
        match key {
            Some(passphrase) => cipher::encrypt(&compressed, passphrase, self.kdf_iterations),
            None => Ok(compressed),
        }
    }

    /// Decrypt (if `key` is given) → decompress → decode
    pub fn open<D: DeserializeOwned>(&self, bytes: &[u8], key: Option<&str>) -> Result<D> {
        let compressed = match key {
            Some(passphrase) => cipher::decrypt(bytes, passphrase, self.kdf_iterations)?,
            None => bytes.to_vec(),
        };
        let encoded = self.decompress(&compressed)?;
        self.codec.decode(&encoded)
    }

    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        compression::compress(bytes, self.compression_level)
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        compression::decompress(bytes)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self {
            codec: Codec::default(),
            compression_level: Self::DEFAULT_COMPRESSION_LEVEL,
            kdf_iterations: Self::DEFAULT_KDF_ITERATIONS,
        }
    }
}
