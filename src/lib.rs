//! # DepotKV
//!
//! An in-memory, string-keyed object store with:
//! - Conflict / not-found checked mutation and an explicit destroyed state
//! - JSON or MessagePack serialization
//! - zstd compression and optional AES-256-GCM passphrase encryption
//! - Persistence as a set of numbered, size-bounded chunk files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                               │
//! │        (depots, readers and writers under one Config)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Depot    │─────────►│   Format    │
//!   │ (BTreeMap)  │          │ codec, zstd,│
//!   └─────────────┘          │   cipher    │
//!                            └──────┬──────┘
//!                                   │ bytes
//!                                   ▼
//!                           ┌───────────────┐
//!                           │  ChunkWriter  │──► {name}-0.bdc
//!                           │  ChunkReader  │◄── {name}-1.bdc …
//!                           └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use depotkv::{Depot, Engine, WriteOptions};
//! use serde_json::json;
//!
//! # fn main() -> depotkv::Result<()> {
//! let engine = Engine::default();
//! let mut depot: Depot = engine.depot();
//! depot.set_item("data", json!({"foo": "foo", "bar": "bar"}))?;
//!
//! let options = WriteOptions::new().chunk_name("T").key("secret").max_chunk_count(2);
//! engine.write(&depot, "temp/", options)?;
//!
//! depot.clear()?;
//! engine.load(&mut depot, "temp/", "T", Some("secret"))?;
//! assert_eq!(depot.get_item("data")?, &json!({"foo": "foo", "bar": "bar"}));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod depot;
pub mod chunk;
pub mod io;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DepotError, Result};
pub use config::Config;
pub use codec::{Codec, Format};
pub use depot::Depot;
pub use chunk::{ChunkOptions, ChunkReader, ChunkSetInfo, ChunkWriter};
pub use engine::{Engine, WriteOptions};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DepotKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
