//! Configuration for DepotKV
//!
//! Centralized configuration with sensible defaults.

use std::num::NonZeroU32;

use crate::codec::{Codec, Format};

/// Main configuration for a DepotKV instance
///
/// Every depot and chunk set produced under one config shares the same
/// codec, compression level and key derivation work factor. Chunk sets carry
/// no format tag, so a set must be read back with the config it was written with.
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Serialization codec for depot contents
    pub codec: Codec,

    // -------------------------------------------------------------------------
    // Compression Configuration
    // -------------------------------------------------------------------------
    /// zstd compression level (1..=22, 0 selects the zstd default)
    pub compression_level: i32,

    // -------------------------------------------------------------------------
    // Cipher Configuration
    // -------------------------------------------------------------------------
    /// PBKDF2 iterations used to derive the AES key from a passphrase
    pub kdf_iterations: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codec: Codec::Json,
            compression_level: Format::DEFAULT_COMPRESSION_LEVEL,
            kdf_iterations: Format::DEFAULT_KDF_ITERATIONS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The transcoding pipeline described by this config
    pub fn format(&self) -> Format {
        Format {
            codec: self.codec,
            compression_level: self.compression_level,
            kdf_iterations: self.kdf_iterations,
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the serialization codec
    pub fn codec(mut self, codec: Codec) -> Self {
        self.config.codec = codec;
        self
    }

    /// Set the zstd compression level
    pub fn compression_level(mut self, level: i32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Set the PBKDF2 iteration count (zero is clamped to one)
    pub fn kdf_iterations(mut self, iterations: u32) -> Self {
        self.config.kdf_iterations = NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
