//! Reader / Writer Module
//!
//! Sources and sinks that produce or consume a flat key→value mapping.
//!
//! | Variant | Reads | Writes |
//! |---|---|---|
//! | chunk set | [`ChunkReader`](crate::chunk::ChunkReader) | [`ChunkWriter`](crate::chunk::ChunkWriter) (bytes) |
//! | JSON file | [`JsonReader`] | [`JsonWriter`] |
//! | in-memory object | [`ObjectReader`] | – |
//! | single file | [`FileReader`] | – |
//! | directory tree | [`DirectoryReader`] | [`DirectoryWriter`] |

mod directory;
mod file;
mod json;
mod object;

use std::collections::BTreeMap;

use crate::error::Result;

pub use directory::{DirectoryReader, DirectoryWriter};
pub use file::FileReader;
pub use json::{JsonReader, JsonWriter};
pub use object::ObjectReader;

/// Produces a key→value mapping from some source
pub trait Reader<T> {
    fn read(&self) -> Result<BTreeMap<String, T>>;
}

/// Consumes a key→value mapping into some sink
pub trait Writer<T> {
    fn write(&self, mapping: &BTreeMap<String, T>) -> Result<()>;
}
