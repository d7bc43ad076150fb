//! Engine Module
//!
//! Wires depots to their readers and writers under one configuration.
//!
//! ## Responsibilities
//! - Create depots, chunk readers and chunk writers sharing one format
//! - Persist a depot as a chunk set and load it back
//! - Bulk load from JSON files, in-memory objects, files and directory trees
//! - Export to JSON and restore directory trees
//!
//! Every chunk operation uses the depot's own format, so a set is always
//! read back with the pipeline that produced it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::chunk::{ChunkOptions, ChunkReader, ChunkSetInfo, ChunkWriter};
use crate::codec::Format;
use crate::config::Config;
use crate::depot::Depot;
use crate::error::Result;
use crate::io::{
    DirectoryReader, DirectoryWriter, FileReader, JsonReader, JsonWriter, ObjectReader, Reader,
    Writer,
};

/// Options for [`Engine::write`]
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Chunk set name and chunking limits
    pub chunk: ChunkOptions,

    /// Passphrase; the payload is encrypted when present
    pub key: Option<String>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk = self.chunk.chunk_name(name);
        self
    }

    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.chunk = self.chunk.max_chunk_size(size);
        self
    }

    pub fn max_chunk_count(mut self, count: usize) -> Self {
        self.chunk = self.chunk.max_chunk_count(count);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// The depot persistence engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Engine configuration
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    // =========================================================================
    // Factories
    // =========================================================================

    /// Create an empty depot using the engine's format
    pub fn depot<T>(&self) -> Depot<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        Depot::with_format(self.format())
    }

    /// Reader for the chunk set `name` under `base`
    pub fn reader(&self, base: impl Into<PathBuf>, name: impl Into<String>) -> ChunkReader {
        ChunkReader::with_format(base, name, self.format())
    }

    /// Writer for a chunk set under `base`
    pub fn writer(&self, base: impl Into<PathBuf>, options: ChunkOptions) -> Result<ChunkWriter> {
        ChunkWriter::with_format(base, options, self.format())
    }

    // =========================================================================
    // Chunk Sets
    // =========================================================================

    /// Serialize `depot` and write it as a chunk set under `base`
    ///
    /// Options are validated before the depot is serialized or any file is written.
    pub fn write<T>(
        &self,
        depot: &Depot<T>,
        base: impl Into<PathBuf>,
        options: WriteOptions,
    ) -> Result<ChunkSetInfo>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let writer = ChunkWriter::with_format(base, options.chunk, depot.format())?;
        let serialized = depot.serialize(options.key.as_deref())?;
        let info = writer.write(&serialized)?;

        tracing::info!(
            name = %info.name,
            chunks = info.chunk_count(),
            bytes = info.total_size(),
            "persisted depot"
        );
        Ok(info)
    }

    /// Replace the contents of `depot` with the chunk set `name` under `base`
    pub fn load<T>(
        &self,
        depot: &mut Depot<T>,
        base: impl Into<PathBuf>,
        name: &str,
        key: Option<&str>,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let reader = ChunkReader::with_format(base, name, depot.format());
        let mapping: BTreeMap<String, T> = reader.read(key)?;

        tracing::info!(name = %name, entries = mapping.len(), "loaded depot");
        depot.load(mapping)
    }

    // =========================================================================
    // Plain Sources and Sinks
    // =========================================================================

    /// Replace the contents of `depot` with a JSON object file
    pub fn load_from_json<T>(&self, depot: &mut Depot<T>, path: impl AsRef<Path>) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        depot.load(JsonReader::new(path.as_ref()).read()?)
    }

    /// Replace the contents of `depot` with a deep copy of `object`
    pub fn load_from_object<T, S>(&self, depot: &mut Depot<T>, object: &S) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
        S: Serialize + ?Sized,
    {
        depot.load(ObjectReader::new(object).read()?)
    }

    /// Insert a deep copy of `object` as a single item
    pub fn insert_object<T, S>(
        &self,
        depot: &mut Depot<T>,
        key: impl Into<String>,
        object: &S,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
        S: Serialize + ?Sized,
    {
        let value: T = ObjectReader::new(object).read_value()?;
        depot.set_item(key, value)
    }

    /// Replace the contents of `depot` with `{file_name: content}`
    pub fn load_from_file(&self, depot: &mut Depot<String>, path: impl AsRef<Path>) -> Result<()> {
        depot.load(FileReader::new(path.as_ref()).read()?)
    }

    /// Replace the contents of `depot` with a snapshot of a directory tree
    pub fn load_from_directory(
        &self,
        depot: &mut Depot<String>,
        dir: impl AsRef<Path>,
    ) -> Result<()> {
        depot.load(DirectoryReader::new(dir.as_ref()).read()?)
    }

    /// Write the plain contents of `depot` as a JSON object file
    pub fn write_to_json<T>(&self, depot: &Depot<T>, path: impl AsRef<Path>) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        JsonWriter::new(path.as_ref()).write(&depot.export()?)
    }

    /// Recreate the directory snapshot held by `depot` under `to`
    pub fn restore_directory(&self, depot: &Depot<String>, to: impl AsRef<Path>) -> Result<()> {
        DirectoryWriter::new(to.as_ref()).write(&depot.export()?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The pipeline new depots and chunk handles are created with
    pub fn format(&self) -> Format {
        self.config.format()
    }
}
