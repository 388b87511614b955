//! Persisted, searchable vector index
//!
//! The index is mutated only by whole-batch [`VectorIndex::merge`] and
//! persisted only by an explicit [`VectorIndex::save`]. It does not
//! deduplicate identities itself; the indexer decides what is new.

mod hnsw;
mod lock;
mod record;
mod storage;

pub use hnsw::HnswParams;
pub use lock::IndexWriteLock;
pub use record::{content_hash, RecordMetadata, VectorRecord};
pub use storage::{FORMAT_VERSION, MANIFEST_FILE};

use crate::chunking::ChunkId;
use crate::config::IndexConfig;
use crate::error::{RagError, Result};
use chrono::{DateTime, Utc};
use hnsw::HnswGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use storage::IndexSnapshot;

/// How nearest neighbours are found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Scan every record; results are fully reproducible
    #[default]
    Exact,
    /// Approximate search over an in-memory HNSW graph
    ///
    /// Neighbours may differ from `Exact`. When the graph yields fewer than
    /// `k` hits on an index holding at least `k` records, the search falls
    /// back to a full scan.
    Hnsw,
}

impl FromStr for SearchStrategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "hnsw" => Ok(Self::Hnsw),
            other => Err(RagError::InvalidArgument(format!(
                "unknown search strategy '{}', expected 'exact' or 'hnsw'",
                other
            ))),
        }
    }
}

/// Search behaviour of an index instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub strategy: SearchStrategy,
    pub hnsw: HnswParams,
}

impl SearchOptions {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            strategy: config.search,
            hnsw: HnswParams {
                m: config.hnsw_m,
                ef_construction: config.hnsw_ef_construction,
                ef_search: config.hnsw_ef_search,
            },
        }
    }
}

/// A record returned by search with its rank and distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub id: ChunkId,
    pub text: String,
    pub metadata: RecordMetadata,
    /// Euclidean distance to the query; smaller is closer
    pub distance: f32,
}

/// Summary of an index for status output
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub record_count: usize,
    pub dimension: Option<usize>,
    pub embedding_model: Option<String>,
    pub generation: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub records_per_source: BTreeMap<String, usize>,
}

pub struct VectorIndex {
    records: Vec<VectorRecord>,
    dimension: Option<usize>,
    embedding_model: Option<String>,
    generation: u64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    options: SearchOptions,
    graph: Option<HnswGraph>,
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("records", &self.records.len())
            .field("dimension", &self.dimension)
            .field("embedding_model", &self.embedding_model)
            .field("generation", &self.generation)
            .field("options", &self.options)
            .finish()
    }
}

impl VectorIndex {
    /// An empty index with exact search
    pub fn create_empty() -> Self {
        Self::with_options(SearchOptions::default())
    }

    pub fn with_options(options: SearchOptions) -> Self {
        Self {
            records: Vec::new(),
            dimension: None,
            embedding_model: None,
            generation: 0,
            created_at: None,
            updated_at: None,
            options,
            graph: None,
        }
    }

    /// Build a batch index from freshly embedded records
    pub fn from_records(records: Vec<VectorRecord>, options: SearchOptions) -> Result<Self> {
        let dimension = check_dimensions(&records, None)?;
        let mut index = Self::with_options(options);
        index.records = records;
        index.dimension = dimension;
        index.rebuild_graph();
        Ok(index)
    }

    /// Load a persisted index
    ///
    /// `IndexNotFound` when nothing was ever saved at `path`;
    /// `IndexVersionMismatch` or `IndexCorrupt` when something was saved but
    /// cannot be used.
    pub fn load(path: &Path, options: SearchOptions) -> Result<Self> {
        let loaded = storage::read_index(path)?;
        let manifest = loaded.manifest;

        check_dimensions(&loaded.records, manifest.dimension)
            .map_err(|e| RagError::corrupt(path, e.to_string()))?;

        let mut index = Self::with_options(options);
        index.records = loaded.records;
        index.dimension = manifest.dimension;
        index.embedding_model = manifest.embedding_model;
        index.generation = manifest.generation;
        index.created_at = Some(manifest.created_at);
        index.updated_at = Some(manifest.updated_at);
        index.rebuild_graph();

        tracing::info!(
            "Loaded index {} (generation {}, {} records)",
            path.display(),
            index.generation,
            index.records.len()
        );
        Ok(index)
    }

    /// Whether a committed index exists at `path`
    pub fn exists(path: &Path) -> bool {
        storage::manifest_exists(path)
    }

    /// Irrecoverably delete a persisted index
    pub fn destroy(path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(path)
            .map_err(|e| RagError::io(e, format!("Failed to delete index: {}", path.display())))?;
        tracing::warn!("Deleted index at {}", path.display());
        Ok(())
    }

    /// Durably persist the whole index
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let manifest = storage::write_index(
            path,
            &IndexSnapshot {
                records: &self.records,
                dimension: self.dimension,
                embedding_model: self.embedding_model.as_deref(),
                generation: self.generation,
                created_at: self.created_at,
            },
        )?;

        self.generation = manifest.generation;
        self.created_at = Some(manifest.created_at);
        self.updated_at = Some(manifest.updated_at);

        tracing::info!(
            "Saved index {} (generation {}, {} records)",
            path.display(),
            self.generation,
            self.records.len()
        );
        Ok(())
    }

    /// Append every record of `other`, in order
    pub fn merge(&mut self, other: VectorIndex) -> Result<()> {
        if other.records.is_empty() {
            return Ok(());
        }

        let dimension = match (self.dimension, other.dimension) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                return Err(RagError::DimensionMismatch {
                    expected: mine,
                    actual: theirs,
                })
            }
            (mine, theirs) => mine.or(theirs),
        };

        if let Some(model) = other.embedding_model.as_deref() {
            self.bind_embedding_model(model)?;
        }

        let added = other.records.len();
        self.dimension = dimension;
        self.records.extend(other.records);
        self.rebuild_graph();

        tracing::debug!("Merged {} records, index now holds {}", added, self.records.len());
        Ok(())
    }

    /// Tag the index with the model its vectors come from
    ///
    /// An untagged index adopts the model; a tagged one must match.
    pub fn bind_embedding_model(&mut self, model: &str) -> Result<()> {
        match self.embedding_model.as_deref() {
            Some(existing) if existing != model => Err(RagError::EmbeddingModelMismatch {
                index: existing.to_string(),
                provider: model.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.embedding_model = Some(model.to_string());
                Ok(())
            }
        }
    }

    /// The `k` records closest to `query`, closest first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Err(RagError::InvalidArgument(
                "k must be greater than 0".to_string(),
            ));
        }
        if self.records.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let wanted = k.min(self.records.len());
        let mut scored = match &self.graph {
            Some(graph) => {
                let approximate = graph.search(query, k);
                if approximate.len() < wanted {
                    tracing::debug!(
                        "HNSW returned {} of {} hits, falling back to exact scan",
                        approximate.len(),
                        wanted
                    );
                    self.exact_scan(query)
                } else {
                    approximate
                }
            }
            None => self.exact_scan(query),
        };

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .filter_map(|(position, distance)| self.records.get(position).map(|r| (r, distance)))
            .enumerate()
            .map(|(rank, (record, distance))| SearchHit {
                rank,
                id: record.id.clone(),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                distance,
            })
            .collect())
    }

    /// Every identity currently stored
    pub fn existing_identities(&self) -> BTreeSet<ChunkId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embedding_model.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn stats(&self) -> IndexStats {
        let mut records_per_source = BTreeMap::new();
        for record in &self.records {
            *records_per_source
                .entry(record.metadata.source.clone())
                .or_insert(0) += 1;
        }

        IndexStats {
            record_count: self.records.len(),
            dimension: self.dimension,
            embedding_model: self.embedding_model.clone(),
            generation: self.generation,
            created_at: self.created_at,
            updated_at: self.updated_at,
            records_per_source,
        }
    }

    fn exact_scan(&self, query: &[f32]) -> Vec<(usize, f32)> {
        self.records
            .iter()
            .enumerate()
            .map(|(position, record)| (position, l2_distance(query, &record.vector)))
            .collect()
    }

    fn rebuild_graph(&mut self) {
        self.graph = match self.options.strategy {
            SearchStrategy::Hnsw if !self.records.is_empty() => Some(HnswGraph::build(
                self.options.hnsw,
                self.records.len(),
                self.records.iter().map(|r| r.vector.as_slice()),
            )),
            _ => None,
        };
    }
}

/// Common dimension of `records`, checked against `expected` when given
fn check_dimensions(records: &[VectorRecord], expected: Option<usize>) -> Result<Option<usize>> {
    let mut dimension = expected;
    for record in records {
        let len = record.vector.len();
        if len == 0 {
            return Err(RagError::InvalidArgument(format!(
                "record {} has an empty vector",
                record.id
            )));
        }
        match dimension {
            Some(d) if d != len => {
                return Err(RagError::DimensionMismatch {
                    expected: d,
                    actual: len,
                })
            }
            Some(_) => {}
            None => dimension = Some(len),
        }
    }
    Ok(dimension)
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: ChunkId::from(id.to_string()),
            text: format!("text of {}", id),
            metadata: RecordMetadata {
                source: id.split(':').next().unwrap_or_default().to_string(),
                page: 0,
                chunk_index: 0,
                content_hash: content_hash(id),
            },
            vector,
        }
    }

    fn index_of(records: Vec<VectorRecord>) -> VectorIndex {
        VectorIndex::from_records(records, SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = index_of(vec![
            record("far:0:0", vec![5.0, 0.0]),
            record("near:0:0", vec![0.0, 1.0]),
        ]);

        let hits = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id.as_str(), "near:0:0");
        assert!((hits[0].distance - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].id.as_str(), "far:0:0");
        assert!((hits[1].distance - 5.0).abs() < 1e-6);
        assert_eq!(hits[1].rank, 1);
    }

    #[test]
    fn test_search_returns_fewer_when_index_small() {
        let index = index_of(vec![record("a:0:0", vec![1.0, 1.0])]);
        assert_eq!(index.search(&[0.0, 0.0], 5).unwrap().len(), 1);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let index = index_of(vec![
            record("first:0:0", vec![1.0, 0.0]),
            record("second:0:0", vec![0.0, 1.0]),
        ]);
        let hits = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].id.as_str(), "first:0:0");
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::create_empty();
        assert!(index.search(&[0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_search_zero_k() {
        let index = VectorIndex::create_empty();
        assert!(matches!(
            index.search(&[0.0], 0),
            Err(RagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_search_wrong_dimension() {
        let index = index_of(vec![record("a:0:0", vec![1.0, 1.0])]);
        assert!(matches!(
            index.search(&[1.0, 1.0, 1.0], 1),
            Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_merge_counts() {
        let mut base = index_of(vec![
            record("a:0:0", vec![0.0, 0.0]),
            record("a:0:1", vec![1.0, 0.0]),
        ]);
        let batch = index_of(vec![
            record("b:0:0", vec![0.0, 1.0]),
            record("b:0:1", vec![1.0, 1.0]),
            record("b:0:2", vec![2.0, 2.0]),
        ]);

        base.merge(batch).unwrap();
        assert_eq!(base.len(), 5);
        assert_eq!(base.existing_identities().len(), 5);
        let order: Vec<&str> = base.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["a:0:0", "a:0:1", "b:0:0", "b:0:1", "b:0:2"]);
    }

    #[test]
    fn test_merge_into_empty_adopts_dimension() {
        let mut base = VectorIndex::create_empty();
        base.merge(index_of(vec![record("a:0:0", vec![1.0, 2.0, 3.0])]))
            .unwrap();
        assert_eq!(base.dimension(), Some(3));
    }

    #[test]
    fn test_merge_rejects_dimension_mismatch() {
        let mut base = index_of(vec![record("a:0:0", vec![0.0, 0.0])]);
        let batch = index_of(vec![record("b:0:0", vec![0.0, 0.0, 0.0])]);
        assert!(matches!(
            base.merge(batch),
            Err(RagError::DimensionMismatch { .. })
        ));
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_from_records_rejects_mixed_dimensions() {
        let result = VectorIndex::from_records(
            vec![record("a:0:0", vec![0.0]), record("a:0:1", vec![0.0, 1.0])],
            SearchOptions::default(),
        );
        assert!(matches!(result, Err(RagError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_bind_embedding_model() {
        let mut index = VectorIndex::create_empty();
        index.bind_embedding_model("model-a").unwrap();
        index.bind_embedding_model("model-a").unwrap();
        assert!(matches!(
            index.bind_embedding_model("model-b"),
            Err(RagError::EmbeddingModelMismatch { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = index_of(vec![
            record("a:0:0", vec![0.0, 1.0]),
            record("a:0:1", vec![3.0, 4.0]),
        ]);
        index.bind_embedding_model("test-model").unwrap();
        index.save(&path).unwrap();
        assert_eq!(index.generation(), 1);

        let loaded = VectorIndex::load(&path, SearchOptions::default()).unwrap();
        assert_eq!(loaded.records(), index.records());
        assert_eq!(loaded.embedding_model(), Some("test-model"));
        assert_eq!(loaded.generation(), 1);

        let query = [0.1, 0.9];
        let before: Vec<ChunkId> = index.search(&query, 2).unwrap().into_iter().map(|h| h.id).collect();
        let after: Vec<ChunkId> = loaded.search(&query, 2).unwrap().into_iter().map(|h| h.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_empty_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        VectorIndex::create_empty().save(&path).unwrap();
        let loaded = VectorIndex::load(&path, SearchOptions::default()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.dimension(), None);
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let result = VectorIndex::load(&temp.path().join("absent"), SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexNotFound { .. })));
    }

    fn saved_index(path: &Path) -> VectorIndex {
        let mut index = index_of(vec![
            record("a:0:0", vec![0.0, 1.0]),
            record("a:0:1", vec![3.0, 4.0]),
        ]);
        index.save(path).unwrap();
        index
    }

    #[test]
    fn test_load_truncated_vectors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        let vectors = path.join("vectors-1.bin");
        let bytes = std::fs::read(&vectors).unwrap();
        std::fs::write(&vectors, &bytes[..bytes.len() - 3]).unwrap();

        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexCorrupt { .. })));
    }

    #[test]
    fn test_load_garbage_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        std::fs::write(path.join(MANIFEST_FILE), b"{ not json").unwrap();
        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexCorrupt { .. })));
    }

    #[test]
    fn test_load_missing_data_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        std::fs::remove_file(path.join("records-1.json.zst")).unwrap();
        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexCorrupt { .. })));
    }

    #[test]
    fn test_load_future_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        let manifest_path = path.join(MANIFEST_FILE);
        let mut manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&manifest_path).unwrap()).unwrap();
        manifest["format_version"] = serde_json::json!(FORMAT_VERSION + 1);
        std::fs::write(&manifest_path, serde_json::to_vec(&manifest).unwrap()).unwrap();

        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(
            result,
            Err(RagError::IndexVersionMismatch { found, expected, .. })
                if found == FORMAT_VERSION + 1 && expected == FORMAT_VERSION
        ));
    }

    fn edit_manifest(path: &Path, field: &str, value: serde_json::Value) {
        let manifest_path = path.join(MANIFEST_FILE);
        let mut manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&manifest_path).unwrap()).unwrap();
        manifest[field] = value;
        std::fs::write(&manifest_path, serde_json::to_vec(&manifest).unwrap()).unwrap();
    }

    #[test]
    fn test_load_oversized_dimension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        edit_manifest(&path, "dimension", serde_json::json!(1u64 << 62));
        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexCorrupt { .. })));
    }

    #[test]
    fn test_load_oversized_record_count() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        saved_index(&path);

        edit_manifest(&path, "record_count", serde_json::json!(1u64 << 62));
        let result = VectorIndex::load(&path, SearchOptions::default());
        assert!(matches!(result, Err(RagError::IndexCorrupt { .. })));
    }

    #[test]
    fn test_interrupted_save_keeps_previous_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        let original = saved_index(&path);

        // Data files of a generation that never got its manifest committed
        std::fs::write(path.join("vectors-2.bin"), b"partial").unwrap();
        std::fs::write(path.join("manifest.json.tmp"), b"{\"format_version\":").unwrap();

        let loaded = VectorIndex::load(&path, SearchOptions::default()).unwrap();
        assert_eq!(loaded.records(), original.records());
        assert_eq!(loaded.generation(), 1);
    }

    #[test]
    fn test_generations_are_pruned() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = index_of(vec![record("a:0:0", vec![0.0, 1.0])]);
        for _ in 0..4 {
            index.save(&path).unwrap();
        }
        assert_eq!(index.generation(), 4);

        assert!(path.join("vectors-4.bin").exists());
        assert!(path.join("vectors-3.bin").exists());
        assert!(!path.join("vectors-2.bin").exists());
        assert!(!path.join("records-1.json.zst").exists());
    }

    #[test]
    fn test_destroy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");
        VectorIndex::create_empty().save(&path).unwrap();
        assert!(VectorIndex::exists(&path));

        VectorIndex::destroy(&path).unwrap();
        assert!(!VectorIndex::exists(&path));
        VectorIndex::destroy(&path).unwrap();
    }

    #[test]
    fn test_hnsw_finds_exact_match() {
        let options = SearchOptions {
            strategy: SearchStrategy::Hnsw,
            hnsw: HnswParams::default(),
        };
        let records = (0..20)
            .map(|i| record(&format!("s:0:{}", i), vec![i as f32, 0.0]))
            .collect();
        let index = VectorIndex::from_records(records, options).unwrap();

        let hits = index.search(&[7.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].id.as_str(), "s:0:7");
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_hnsw_returns_k_hits_when_available() {
        let options = SearchOptions {
            strategy: SearchStrategy::Hnsw,
            hnsw: HnswParams {
                m: 2,
                ef_construction: 2,
                ef_search: 1,
            },
        };
        let records: Vec<VectorRecord> = (0..40)
            .map(|i| record(&format!("s:0:{}", i), vec![(i % 7) as f32, (i / 7) as f32]))
            .collect();
        let total = records.len();
        let index = VectorIndex::from_records(records, options).unwrap();

        assert_eq!(index.search(&[3.0, 3.0], total).unwrap().len(), total);
        assert_eq!(index.search(&[0.0, 0.0], 25).unwrap().len(), 25);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("HNSW".parse::<SearchStrategy>().unwrap(), SearchStrategy::Hnsw);
        assert_eq!("exact".parse::<SearchStrategy>().unwrap(), SearchStrategy::Exact);
        assert!("annoy".parse::<SearchStrategy>().is_err());
    }
}
