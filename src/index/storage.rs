//! On-disk format of a persisted index
//!
//! ```text
//! <index>/manifest.json            commit point
//! <index>/vectors-<gen>.bin        little-endian f32, record_count * dimension
//! <index>/records-<gen>.json.zst   zstd JSON array of {id, text, metadata}
//! ```
//!
//! A save writes the data files of a new generation, then replaces the
//! manifest with a rename. Readers see either the old or the new manifest,
//! and the files of the previous generation are kept so a reader holding
//! the old manifest can still finish.

use super::record::{RecordMetadata, VectorRecord};
use crate::chunking::ChunkId;
use crate::error::{RagError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_TMP_FILE: &str = "manifest.json.tmp";
const METRIC: &str = "l2";
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Manifest {
    pub format_version: u32,
    pub generation: u64,
    pub dimension: Option<usize>,
    pub record_count: usize,
    pub metric: String,
    pub embedding_model: Option<String>,
    pub vectors_file: String,
    pub records_file: String,
    pub vectors_blake3: String,
    pub records_blake3: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    id: ChunkId,
    text: String,
    metadata: RecordMetadata,
}

/// Everything a load reconstructs
pub(crate) struct LoadedIndex {
    pub records: Vec<VectorRecord>,
    pub manifest: Manifest,
}

/// Snapshot of index state to persist
pub(crate) struct IndexSnapshot<'a> {
    pub records: &'a [VectorRecord],
    pub dimension: Option<usize>,
    pub embedding_model: Option<&'a str>,
    pub generation: u64,
    pub created_at: Option<DateTime<Utc>>,
}

pub(crate) fn manifest_exists(path: &Path) -> bool {
    path.join(MANIFEST_FILE).is_file()
}

pub(crate) fn read_index(path: &Path) -> Result<LoadedIndex> {
    let manifest_path = path.join(MANIFEST_FILE);
    let manifest_bytes = match fs::read(&manifest_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RagError::IndexNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(RagError::io(
                e,
                format!("Failed to read manifest: {}", manifest_path.display()),
            ))
        }
    };

    let probe: VersionProbe = serde_json::from_slice(&manifest_bytes)
        .map_err(|e| RagError::corrupt(path, format!("unreadable manifest: {}", e)))?;
    if probe.format_version != FORMAT_VERSION {
        return Err(RagError::IndexVersionMismatch {
            path: path.to_path_buf(),
            found: probe.format_version,
            expected: FORMAT_VERSION,
        });
    }

    let manifest: Manifest = serde_json::from_slice(&manifest_bytes)
        .map_err(|e| RagError::corrupt(path, format!("invalid manifest: {}", e)))?;
    if manifest.metric != METRIC {
        return Err(RagError::corrupt(
            path,
            format!("unknown distance metric '{}'", manifest.metric),
        ));
    }

    let vector_bytes = read_data_file(path, &manifest.vectors_file, &manifest.vectors_blake3)?;
    let vectors = decode_vectors(path, &vector_bytes, &manifest)?;

    let record_bytes = read_data_file(path, &manifest.records_file, &manifest.records_blake3)?;
    let json = zstd::decode_all(&record_bytes[..])
        .map_err(|e| RagError::corrupt(path, format!("records are not valid zstd: {}", e)))?;
    let stored: Vec<StoredRecord> = serde_json::from_slice(&json)
        .map_err(|e| RagError::corrupt(path, format!("records are not valid JSON: {}", e)))?;

    if stored.len() != manifest.record_count {
        return Err(RagError::corrupt(
            path,
            format!(
                "manifest declares {} records, records file holds {}",
                manifest.record_count,
                stored.len()
            ),
        ));
    }

    let records = stored
        .into_iter()
        .zip(vectors)
        .map(|(record, vector)| VectorRecord {
            id: record.id,
            vector,
            text: record.text,
            metadata: record.metadata,
        })
        .collect();

    Ok(LoadedIndex { records, manifest })
}

/// Persist a new generation and return its manifest
pub(crate) fn write_index(path: &Path, snapshot: &IndexSnapshot<'_>) -> Result<Manifest> {
    fs::create_dir_all(path)
        .map_err(|e| RagError::io(e, format!("Failed to create index directory: {}", path.display())))?;

    // Never reuse a generation number already on disk, even when saving an
    // index that was loaded from somewhere else.
    let on_disk = peek_generation(path).unwrap_or(0);
    let generation = snapshot.generation.max(on_disk) + 1;

    let vectors_file = format!("vectors-{}.bin", generation);
    let records_file = format!("records-{}.json.zst", generation);

    let vector_bytes = encode_vectors(snapshot.records);
    write_synced(&path.join(&vectors_file), &vector_bytes)?;

    let stored: Vec<StoredRecord> = snapshot
        .records
        .iter()
        .map(|r| StoredRecord {
            id: r.id.clone(),
            text: r.text.clone(),
            metadata: r.metadata.clone(),
        })
        .collect();
    let json = serde_json::to_vec(&stored).map_err(|e| RagError::Json {
        source: e,
        context: "Failed to serialize records".to_string(),
    })?;
    let record_bytes = zstd::encode_all(&json[..], ZSTD_LEVEL)
        .map_err(|e| RagError::io(e, "Failed to compress records"))?;
    write_synced(&path.join(&records_file), &record_bytes)?;

    let now = Utc::now();
    let manifest = Manifest {
        format_version: FORMAT_VERSION,
        generation,
        dimension: snapshot.dimension,
        record_count: snapshot.records.len(),
        metric: METRIC.to_string(),
        embedding_model: snapshot.embedding_model.map(str::to_string),
        vectors_file,
        records_file,
        vectors_blake3: blake3::hash(&vector_bytes).to_hex().to_string(),
        records_blake3: blake3::hash(&record_bytes).to_hex().to_string(),
        created_at: snapshot.created_at.unwrap_or(now),
        updated_at: now,
    };

    let manifest_json = serde_json::to_vec_pretty(&manifest).map_err(|e| RagError::Json {
        source: e,
        context: "Failed to serialize manifest".to_string(),
    })?;
    let tmp_path = path.join(MANIFEST_TMP_FILE);
    write_synced(&tmp_path, &manifest_json)?;
    fs::rename(&tmp_path, path.join(MANIFEST_FILE)).map_err(|e| {
        RagError::io(
            e,
            format!("Failed to commit manifest in {}", path.display()),
        )
    })?;
    sync_dir(path);

    remove_stale_generations(path, generation);
    Ok(manifest)
}

fn read_data_file(index_path: &Path, name: &str, expected_hash: &str) -> Result<Vec<u8>> {
    if name.is_empty() || name.contains(&['/', '\\'][..]) || name == ".." {
        return Err(RagError::corrupt(
            index_path,
            format!("invalid data file name '{}'", name),
        ));
    }

    let file_path = index_path.join(name);
    let bytes = match fs::read(&file_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RagError::corrupt(
                index_path,
                format!("data file {} is missing", name),
            ))
        }
        Err(e) => {
            return Err(RagError::io(
                e,
                format!("Failed to read {}", file_path.display()),
            ))
        }
    };

    let actual = blake3::hash(&bytes).to_hex().to_string();
    if actual != expected_hash {
        return Err(RagError::corrupt(
            index_path,
            format!("checksum mismatch for {}", name),
        ));
    }
    Ok(bytes)
}

fn encode_vectors(records: &[VectorRecord]) -> Vec<u8> {
    let floats: usize = records.iter().map(|r| r.vector.len()).sum();
    let mut bytes = Vec::with_capacity(floats * 4);
    for record in records {
        for value in &record.vector {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

fn decode_vectors(index_path: &Path, bytes: &[u8], manifest: &Manifest) -> Result<Vec<Vec<f32>>> {
    let dimension = match (manifest.dimension, manifest.record_count) {
        (_, 0) => return check_empty(index_path, bytes),
        (Some(d), _) if d > 0 => d,
        _ => {
            return Err(RagError::corrupt(
                index_path,
                "records present but dimension unset",
            ))
        }
    };

    let row_bytes = dimension
        .checked_mul(4)
        .ok_or_else(|| RagError::corrupt(index_path, "vector size overflows"))?;
    let expected = manifest
        .record_count
        .checked_mul(row_bytes)
        .ok_or_else(|| RagError::corrupt(index_path, "vector size overflows"))?;
    if bytes.len() != expected {
        return Err(RagError::corrupt(
            index_path,
            format!(
                "vectors file holds {} bytes, expected {}",
                bytes.len(),
                expected
            ),
        ));
    }

    Ok(bytes
        .chunks_exact(row_bytes)
        .map(|row| {
            row.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        })
        .collect())
}

fn check_empty(index_path: &Path, bytes: &[u8]) -> Result<Vec<Vec<f32>>> {
    if bytes.is_empty() {
        Ok(Vec::new())
    } else {
        Err(RagError::corrupt(
            index_path,
            "vectors file is not empty for an empty index",
        ))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| RagError::io(e, format!("Failed to create {}", path.display())))?;
    file.write_all(bytes)
        .map_err(|e| RagError::io(e, format!("Failed to write {}", path.display())))?;
    file.sync_all()
        .map_err(|e| RagError::io(e, format!("Failed to sync {}", path.display())))?;
    Ok(())
}

#[cfg(unix)]
fn sync_dir(path: &Path) {
    let synced = File::open(path).and_then(|dir| dir.sync_all());
    if let Err(e) = synced {
        tracing::warn!("Failed to sync directory {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) {}

fn peek_generation(path: &Path) -> Option<u64> {
    let bytes = fs::read(path.join(MANIFEST_FILE)).ok()?;
    let manifest: Manifest = serde_json::from_slice(&bytes).ok()?;
    Some(manifest.generation)
}

/// Keep the current and previous generation; everything older goes
fn remove_stale_generations(path: &Path, current: u64) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list {} for cleanup: {}", path.display(), e);
            return;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let Some(generation) = name.to_str().and_then(data_file_generation) else {
            continue;
        };
        if generation + 1 < current {
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::warn!("Failed to remove stale {}: {}", entry.path().display(), e);
            }
        }
    }
}

fn data_file_generation(name: &str) -> Option<u64> {
    let number = name
        .strip_prefix("vectors-")
        .and_then(|rest| rest.strip_suffix(".bin"))
        .or_else(|| {
            name.strip_prefix("records-")
                .and_then(|rest| rest.strip_suffix(".json.zst"))
        })?;
    number.parse().ok()
}
