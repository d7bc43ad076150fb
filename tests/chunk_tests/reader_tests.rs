//! Tests for ChunkReader
//!
//! These tests verify:
//! - Sequential discovery and in-order reassembly
//! - Missing chunk 0 vs. gaps further on
//! - Decompression / decryption / decoding of a set
//! - Inspection without decoding

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use depotkv::io::Reader;
use depotkv::{ChunkOptions, ChunkReader, ChunkWriter, Config, Depot, DepotError, Format};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn fast_format() -> Format {
    Config::builder().kdf_iterations(1_000).build().format()
}

/// Write raw chunk files directly, bypassing the writer
fn write_raw_chunks(dir: &PathBuf, name: &str, chunks: &[&[u8]]) {
    for (i, chunk) in chunks.iter().enumerate() {
        fs::write(dir.join(format!("{}-{}.bdc", name, i)), chunk).unwrap();
    }
}

fn sample_depot() -> Depot {
    let mut depot = Depot::with_format(fast_format());
    depot
        .set_item("data", json!({"foo": "foo", "bar": "bar"}))
        .unwrap();
    depot.set_item("count", json!(3)).unwrap();
    depot
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_missing_set_is_an_error() {
    let (_temp, path) = setup_temp_dir();
    let reader = ChunkReader::new(&path, "nothing");

    assert!(!reader.exists());
    assert!(matches!(
        reader.read_raw(),
        Err(DepotError::ChunkDoesNotExist(name)) if name == "nothing"
    ));
    assert!(matches!(
        reader.read::<Value>(None),
        Err(DepotError::ChunkDoesNotExist(_))
    ));
    assert!(matches!(
        reader.inspect(),
        Err(DepotError::ChunkDoesNotExist(_))
    ));
}

#[test]
fn test_missing_chunk_zero_ignores_later_chunks() {
    let (_temp, path) = setup_temp_dir();
    fs::write(path.join("T-1.bdc"), b"orphan").unwrap();

    let result = ChunkReader::new(&path, "T").read_raw();

    assert!(matches!(result, Err(DepotError::ChunkDoesNotExist(_))));
}

#[test]
fn test_concatenates_in_index_order() {
    let (_temp, path) = setup_temp_dir();
    write_raw_chunks(&path, "T", &[b"aa", b"bb", b"cc"]);

    let raw = ChunkReader::new(&path, "T").read_raw().unwrap();

    assert_eq!(raw, b"aabbcc");
}

#[test]
fn test_gap_truncates_silently() {
    let (_temp, path) = setup_temp_dir();
    write_raw_chunks(&path, "T", &[b"c0", b"c1", b"c2", b"c3"]);
    fs::remove_file(path.join("T-2.bdc")).unwrap();

    let raw = ChunkReader::new(&path, "T").read_raw().unwrap();

    assert_eq!(raw, b"c0c1");
}

#[test]
fn test_other_sets_in_same_directory_are_ignored() {
    let (_temp, path) = setup_temp_dir();
    write_raw_chunks(&path, "A", &[b"a0", b"a1"]);
    write_raw_chunks(&path, "AB", &[b"x0"]);
    fs::write(path.join("A-2.txt"), b"wrong extension").unwrap();

    let raw = ChunkReader::new(&path, "A").read_raw().unwrap();

    assert_eq!(raw, b"a0a1");
}

#[test]
fn test_directory_with_chunk_name_is_not_a_chunk() {
    let (_temp, path) = setup_temp_dir();
    fs::create_dir(path.join("T-0.bdc")).unwrap();

    assert!(!ChunkReader::new(&path, "T").exists());
}

// =============================================================================
// Reassembly Tests
// =============================================================================

#[test]
fn test_read_bytes_returns_writer_input() {
    let (_temp, path) = setup_temp_dir();
    let payload: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T").max_chunk_size(128))
        .unwrap()
        .write(&payload)
        .unwrap();

    let bytes = ChunkReader::new(&path, "T").read_bytes().unwrap();

    assert_eq!(bytes, payload);
}

#[test]
fn test_read_decodes_depot_payload() {
    let (_temp, path) = setup_temp_dir();
    let depot = sample_depot();
    ChunkWriter::with_format(
        &path,
        ChunkOptions::new().chunk_name("T").max_chunk_count(2),
        fast_format(),
    )
    .unwrap()
    .write(&depot.serialize(None).unwrap())
    .unwrap();

    let reader = ChunkReader::with_format(&path, "T", fast_format());
    let mapping: BTreeMap<String, Value> = reader.read(None).unwrap();

    assert_eq!(mapping, depot.export().unwrap());
}

#[test]
fn test_read_encrypted_payload() {
    let (_temp, path) = setup_temp_dir();
    let depot = sample_depot();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T").max_chunk_size(16))
        .unwrap()
        .write(&depot.serialize(Some("secret")).unwrap())
        .unwrap();

    let reader = ChunkReader::with_format(&path, "T", fast_format());

    let mapping: BTreeMap<String, Value> = reader.read(Some("secret")).unwrap();
    assert_eq!(mapping, depot.export().unwrap());

    assert!(matches!(
        reader.read::<Value>(Some("wrong")),
        Err(DepotError::AuthenticationFailed)
    ));
    assert!(reader.read::<Value>(None).is_err());
}

#[test]
fn test_reader_trait_uses_configured_key() {
    let (_temp, path) = setup_temp_dir();
    let depot = sample_depot();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T"))
        .unwrap()
        .write(&depot.serialize(Some("secret")).unwrap())
        .unwrap();

    let reader = ChunkReader::with_format(&path, "T", fast_format()).with_key("secret");
    let mapping: BTreeMap<String, Value> = Reader::read(&reader).unwrap();

    assert_eq!(mapping, depot.export().unwrap());
}

#[test]
fn test_truncated_set_fails_to_decode() {
    let (_temp, path) = setup_temp_dir();
    let depot = sample_depot();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T").max_chunk_count(4))
        .unwrap()
        .write(&depot.serialize(None).unwrap())
        .unwrap();
    fs::remove_file(path.join("T-3.bdc")).unwrap();

    let reader = ChunkReader::with_format(&path, "T", fast_format());

    assert!(reader.read::<Value>(None).is_err());
}

#[test]
fn test_corrupted_chunk_fails_to_decode() {
    let (_temp, path) = setup_temp_dir();
    let depot = sample_depot();
    ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T").max_chunk_count(2))
        .unwrap()
        .write(&depot.serialize(Some("secret")).unwrap())
        .unwrap();
    fs::write(path.join("T-1.bdc"), b"garbage garbage garbage").unwrap();

    let reader = ChunkReader::with_format(&path, "T", fast_format());

    assert!(reader.read::<Value>(Some("secret")).is_err());
}

// =============================================================================
// Inspect Tests
// =============================================================================

#[test]
fn test_inspect_matches_written_set() {
    let (_temp, path) = setup_temp_dir();
    let written = ChunkWriter::new(&path, ChunkOptions::new().chunk_name("T").max_chunk_size(10))
        .unwrap()
        .write(b"some payload that spans several small chunks")
        .unwrap();

    let inspected = ChunkReader::new(&path, "T").inspect().unwrap();

    assert_eq!(inspected, written);
    assert_eq!(inspected.chunks[0].index, 0);
    assert_eq!(inspected.chunks[0].path, path.join("T-0.bdc"));
}
