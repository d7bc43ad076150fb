//! Tests for ChunkWriter
//!
//! These tests verify:
//! - File naming and placement
//! - Slicing by max chunk size and max chunk count
//! - Option validation before any file is written
//! - Overwrite behaviour and stale chunks

use std::fs;
use std::path::{Path, PathBuf};

use depotkv::chunk::{chunk_path, chunk_ranges, ChunkPolicy, CHUNK_EXTENSION};
use depotkv::codec::compression;
use depotkv::{ChunkOptions, ChunkReader, ChunkWriter, DepotError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

/// Deterministic bytes that zstd cannot shrink much
fn noisy_bytes(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_single_chunk_without_policy() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T")).unwrap();

    let info = writer.write(b"hello chunks").unwrap();

    assert_eq!(info.name, "T");
    assert_eq!(info.chunk_count(), 1);
    assert_eq!(files_in(&path), vec![format!("T-0.{}", CHUNK_EXTENSION)]);
}

#[test]
fn test_default_name_is_timestamp() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(&path, ChunkOptions::new()).unwrap();

    assert!(!writer.chunk_name().is_empty());
    assert!(writer.chunk_name().chars().all(|c| c.is_ascii_digit()));

    let info = writer.write(b"payload").unwrap();
    assert!(chunk_path(&path, writer.chunk_name(), 0).exists());
    assert_eq!(info.name, writer.chunk_name());
}

#[test]
fn test_creates_missing_base_directory() {
    let (_temp, path) = setup_temp_dir();
    let base = path.join("nested").join("dir");
    let writer = ChunkWriter::new(&base, ChunkOptions::new().chunk_name("T")).unwrap();

    writer.write(b"payload").unwrap();

    assert!(base.join("T-0.bdc").is_file());
}

#[test]
fn test_chunk_content_is_compressed_slice() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T")).unwrap();
    let data = vec![b'z'; 5000];

    writer.write(&data).unwrap();

    let stored = fs::read(path.join("T-0.bdc")).unwrap();
    assert!(stored.len() < data.len());
    assert_eq!(compression::decompress(&stored).unwrap(), data);
}

// =============================================================================
// Slicing Tests
// =============================================================================

#[test]
fn test_max_chunk_size_slicing() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(
        &path,
        ChunkOptions::new().chunk_name("S").max_chunk_size(300),
    )
    .unwrap();

    let info = writer.write(&noisy_bytes(1000)).unwrap();

    let total = info.total_size() as usize;
    let expected: Vec<u64> = chunk_ranges(total, ChunkPolicy::MaxSize(300))
        .iter()
        .map(|r| r.len() as u64)
        .collect();
    assert_eq!(info.sizes(), expected);
    assert_eq!(info.chunk_count(), total.div_ceil(300));
    assert!(info.sizes()[..info.chunk_count() - 1].iter().all(|&s| s == 300));

    for chunk in &info.chunks {
        assert_eq!(fs::metadata(&chunk.path).unwrap().len(), chunk.size);
    }
}

#[test]
fn test_max_chunk_count_slicing() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(
        &path,
        ChunkOptions::new().chunk_name("C").max_chunk_count(3),
    )
    .unwrap();

    let info = writer.write(&noisy_bytes(1000)).unwrap();

    let total = info.total_size() as usize;
    let size = total.div_ceil(3) as u64;
    assert_eq!(info.chunk_count(), 3);
    assert_eq!(info.sizes()[0], size);
    assert_eq!(info.sizes()[1], size);
    assert!(info.sizes()[2] <= size);
    assert_eq!(files_in(&path), vec!["C-0.bdc", "C-1.bdc", "C-2.bdc"]);
}

#[test]
fn test_max_chunk_count_writes_empty_trailing_chunks() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(
        &path,
        ChunkOptions::new().chunk_name("E").max_chunk_count(500),
    )
    .unwrap();

    let info = writer.write(b"tiny").unwrap();

    assert_eq!(info.chunk_count(), 500);
    assert!(path.join("E-499.bdc").is_file());
    assert_eq!(info.chunks.last().unwrap().size, 0);

    let reader = ChunkReader::new(&path, "E");
    assert_eq!(reader.read_bytes().unwrap(), b"tiny");
}

#[test]
fn test_chunk_size_larger_than_payload() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(
        &path,
        ChunkOptions::new().chunk_name("L").max_chunk_size(1 << 20),
    )
    .unwrap();

    let info = writer.write(b"small").unwrap();

    assert_eq!(info.chunk_count(), 1);
}

#[test]
fn test_checksums_match_files() {
    let (_temp, path) = setup_temp_dir();
    let writer = ChunkWriter::new(
        &path,
        ChunkOptions::new().chunk_name("K").max_chunk_size(64),
    )
    .unwrap();

    let info = writer.write(&noisy_bytes(400)).unwrap();

    for chunk in &info.chunks {
        let bytes = fs::read(&chunk.path).unwrap();
        assert_eq!(crc32fast::hash(&bytes), chunk.crc32);
    }
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_both_limits_rejected_before_writing() {
    let (_temp, path) = setup_temp_dir();
    let base = path.join("never-created");

    let result = ChunkWriter::new(
        &base,
        ChunkOptions::new()
            .chunk_name("X")
            .max_chunk_size(10)
            .max_chunk_count(2),
    );

    assert!(matches!(result, Err(DepotError::IllegalParameter(_))));
    assert!(!base.exists());
}

#[test]
fn test_zero_limit_rejected() {
    let (_temp, path) = setup_temp_dir();

    assert!(matches!(
        ChunkWriter::new(&path, ChunkOptions::new().max_chunk_size(0)),
        Err(DepotError::IllegalParameter(_))
    ));
    assert!(matches!(
        ChunkWriter::new(&path, ChunkOptions::new().max_chunk_count(0)),
        Err(DepotError::IllegalParameter(_))
    ));
}

// =============================================================================
// Overwrite Tests
// =============================================================================

#[test]
fn test_rewrite_overwrites_chunks() {
    let (_temp, path) = setup_temp_dir();
    let options = ChunkOptions::new().chunk_name("R").max_chunk_count(2);

    ChunkWriter::new(&path, options.clone())
        .unwrap()
        .write(b"first version")
        .unwrap();
    ChunkWriter::new(&path, options)
        .unwrap()
        .write(b"second version")
        .unwrap();

    let reader = ChunkReader::new(&path, "R");
    assert_eq!(reader.read_bytes().unwrap(), b"second version");
}

#[test]
fn test_stale_higher_chunk_corrupts_read() {
    let (_temp, path) = setup_temp_dir();

    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("S").max_chunk_count(4))
        .unwrap()
        .write(&noisy_bytes(2000))
        .unwrap();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("S").max_chunk_count(2))
        .unwrap()
        .write(b"shorter")
        .unwrap();

    // Chunks 2 and 3 from the first write are still there
    assert!(path.join("S-3.bdc").exists());
    let reader = ChunkReader::new(&path, "S");
    assert_ne!(reader.read_bytes().ok(), Some(b"shorter".to_vec()));
}
