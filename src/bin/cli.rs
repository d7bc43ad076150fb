//! DepotKV CLI
//!
//! Packs directory trees into chunk sets and unpacks them again.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use depotkv::{ChunkOptions, Codec, Config, Depot, Engine, Format, Result, WriteOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// DepotKV CLI
#[derive(Parser, Debug)]
#[command(name = "depotkv")]
#[command(about = "Chunked, compressed, optionally encrypted object store")]
#[command(version)]
struct Args {
    /// Serialization codec (json or msgpack)
    #[arg(short, long, default_value = "json")]
    codec: Codec,

    /// zstd compression level
    #[arg(short, long, default_value_t = Format::DEFAULT_COMPRESSION_LEVEL)]
    level: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Snapshot a directory into a chunk set
    Pack {
        /// Directory to snapshot
        dir: PathBuf,

        /// Directory that receives the chunk files
        #[arg(short, long)]
        out: PathBuf,

        /// Chunk set name (defaults to a timestamp)
        #[arg(short, long)]
        name: Option<String>,

        /// Passphrase to encrypt with
        #[arg(short, long)]
        key: Option<String>,

        /// Maximum bytes per chunk
        #[arg(long)]
        max_chunk_size: Option<usize>,

        /// Fixed number of chunks
        #[arg(long)]
        max_chunk_count: Option<usize>,
    },

    /// Restore a directory from a chunk set
    Unpack {
        /// Directory holding the chunk files
        #[arg(short, long)]
        base: PathBuf,

        /// Chunk set name
        #[arg(short, long)]
        name: String,

        /// Target directory
        #[arg(short, long)]
        to: PathBuf,

        /// Passphrase the set was encrypted with
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Export a chunk set as a plain JSON file
    Export {
        #[arg(short, long)]
        base: PathBuf,

        #[arg(short, long)]
        name: String,

        /// Output JSON file
        #[arg(short, long)]
        to: PathBuf,

        #[arg(short, long)]
        key: Option<String>,
    },

    /// List the chunks of a set with their sizes and checksums
    Inspect {
        #[arg(short, long)]
        base: PathBuf,

        #[arg(short, long)]
        name: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,depotkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .codec(args.codec)
        .compression_level(args.level)
        .build();
    let engine = Engine::new(config);

    if let Err(e) = run(&engine, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(engine: &Engine, command: Commands) -> Result<()> {
    match command {
        Commands::Pack {
            dir,
            out,
            name,
            key,
            max_chunk_size,
            max_chunk_count,
        } => {
            let mut depot: Depot<String> = engine.depot();
            engine.load_from_directory(&mut depot, &dir)?;

            let options = WriteOptions {
                chunk: ChunkOptions {
                    chunk_name: name,
                    max_chunk_size,
                    max_chunk_count,
                },
                key,
            };
            let info = engine.write(&depot, &out, options)?;
            println!("{} ({} chunks, {} bytes)", info.name, info.chunk_count(), info.total_size());
        }
        Commands::Unpack { base, name, to, key } => {
            let mut depot: Depot<String> = engine.depot();
            engine.load(&mut depot, &base, &name, key.as_deref())?;
            engine.restore_directory(&depot, &to)?;
            println!("restored {} files to {}", depot.len()?, to.display());
        }
        Commands::Export { base, name, to, key } => {
            let mut depot: Depot = engine.depot();
            engine.load(&mut depot, &base, &name, key.as_deref())?;
            engine.write_to_json(&depot, &to)?;
            println!("exported {} entries to {}", depot.len()?, to.display());
        }
        Commands::Inspect { base, name } => {
            let info = engine.reader(&base, &name).inspect()?;
            for chunk in &info.chunks {
                println!(
                    "{:>6}  {:>10}  {:08x}  {}",
                    chunk.index,
                    chunk.size,
                    chunk.crc32,
                    chunk.path.display()
                );
            }
            println!("{} chunks, {} bytes", info.chunk_count(), info.total_size());
        }
    }
    Ok(())
}
