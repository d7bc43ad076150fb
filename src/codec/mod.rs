//! Codec Module
//!
//! Turns a depot mapping into bytes and back.
//!
//! ## Layering
//! ```text
//!   write:  mapping ──► Codec::encode ──► compress ──► [encrypt] ──► bytes
//!   read:   bytes ──► [decrypt] ──► decompress ──► Codec::decode ──► mapping
//! ```
//!
//! The [`Format`] pipeline owns this order so the write and read sides
//! can never disagree on it.

pub mod cipher;
pub mod compression;
mod format;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DepotError, Result};

pub use format::Format;

/// Serialization codec used for depot contents
///
/// Exactly one codec is active per depot. Neither encoding is tagged on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// UTF-8 JSON text
    #[default]
    Json,

    /// MessagePack with named struct fields
    MessagePack,
}

impl Codec {
    /// Encode any serializable value
    pub fn encode<S: Serialize + ?Sized>(&self, value: &S) -> Result<Vec<u8>> {
        match self {
            Codec::Json => {
                serde_json::to_vec(value).map_err(|e| DepotError::Serialization(e.to_string()))
            }
            Codec::MessagePack => {
                rmp_serde::to_vec_named(value).map_err(|e| DepotError::Serialization(e.to_string()))
            }
        }
    }

    /// Decode bytes produced by [`Codec::encode`]
    pub fn decode<D: DeserializeOwned>(&self, bytes: &[u8]) -> Result<D> {
        match self {
            Codec::Json => {
                serde_json::from_slice(bytes).map_err(|e| DepotError::Serialization(e.to_string()))
            }
            Codec::MessagePack => {
                rmp_serde::from_slice(bytes).map_err(|e| DepotError::Serialization(e.to_string()))
            }
        }
    }

    /// Short lowercase name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Json => "json",
            Codec::MessagePack => "msgpack",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = DepotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Codec::Json),
            "msgpack" | "messagepack" => Ok(Codec::MessagePack),
            other => Err(DepotError::IllegalParameter(format!(
                "Unknown codec '{}', expected json or msgpack",
                other
            ))),
        }
    }
}
