//! Index build pipeline
//!
//! ```text
//! Start -> [Reset] -> Load-or-Create -> Chunk -> Identify -> Filter-New
//!       -> Embed-New -> Merge -> Persist -> Done
//! ```
//!
//! Runs are idempotent: chunks whose identity is already stored are skipped,
//! and a run with nothing new leaves the persisted index untouched.

use crate::chunking::{assign_ids, split_documents, IdentifiedChunk};
use crate::config::Config;
use crate::documents::DocumentLoader;
use crate::embedding::{embed_in_batches, EmbeddingProvider};
use crate::error::{RagError, Result};
use crate::index::{content_hash, IndexWriteLock, SearchOptions, VectorIndex, VectorRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one build run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub documents: usize,
    pub chunks: usize,
    /// Chunks whose identity was already in the index
    pub skipped: usize,
    /// Skipped chunks whose text no longer matches the stored hash
    pub changed: usize,
    /// Whitespace-only chunks, identified but never embedded
    pub blank: usize,
    pub added: usize,
    pub total_records: usize,
    pub generation: u64,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.added == 0 {
            write!(f, "Nothing new to add")
        } else {
            write!(f, "Added {} documents", self.added)
        }
    }
}

pub struct Indexer<'a> {
    config: &'a Config,
    loader: &'a dyn DocumentLoader,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> Indexer<'a> {
    pub fn new(
        config: &'a Config,
        loader: &'a dyn DocumentLoader,
        embedder: &'a dyn EmbeddingProvider,
    ) -> Self {
        Self {
            config,
            loader,
            embedder,
        }
    }

    /// Bring the index at `index_path` up to date with `source_dir`
    pub fn build(&self, source_dir: &Path, index_path: &Path, reset: bool) -> Result<BuildReport> {
        let start = Instant::now();
        let _lock = IndexWriteLock::acquire(index_path)?;

        if reset {
            info!("Resetting index at {}", index_path.display());
            VectorIndex::destroy(index_path)?;
        }

        let mut index = self.load_or_create(index_path)?;
        index.bind_embedding_model(self.embedder.model_name())?;

        let documents = self.loader.load(source_dir)?;
        info!(
            "Loaded {} pages from {}",
            documents.len(),
            source_dir.display()
        );

        let chunks = split_documents(&documents, &self.config.chunking)?;
        info!("Split into {} chunks", chunks.len());

        let identified = assign_ids(chunks)?;
        let mut report = BuildReport {
            documents: documents.len(),
            chunks: identified.len(),
            ..BuildReport::default()
        };

        let fresh = self.filter_new(&index, identified, &mut report);
        if fresh.is_empty() {
            info!("Nothing new to add ({} already indexed)", report.skipped);
            report.total_records = index.len();
            report.generation = index.generation();
            return Ok(report);
        }
        info!("Adding {} new chunks", fresh.len());

        let records = self.embed(fresh)?;
        report.added = records.len();

        let batch = VectorIndex::from_records(records, index.options())?;
        index.merge(batch)?;
        index.save(index_path)?;

        report.total_records = index.len();
        report.generation = index.generation();
        info!(
            "Build finished in {:.2}s: {} added, {} skipped, {} total",
            start.elapsed().as_secs_f64(),
            report.added,
            report.skipped,
            report.total_records
        );
        Ok(report)
    }

    fn load_or_create(&self, index_path: &Path) -> Result<VectorIndex> {
        let options = SearchOptions::from_config(&self.config.index);
        match VectorIndex::load(index_path, options) {
            Ok(index) => Ok(index),
            Err(RagError::IndexNotFound { .. }) => {
                info!("No index at {}, creating one", index_path.display());
                Ok(VectorIndex::with_options(options))
            }
            Err(e) => Err(e),
        }
    }

    fn filter_new(
        &self,
        index: &VectorIndex,
        identified: Vec<IdentifiedChunk>,
        report: &mut BuildReport,
    ) -> Vec<IdentifiedChunk> {
        let stored: HashMap<_, _> = index
            .records()
            .iter()
            .map(|record| (&record.id, record.metadata.content_hash.as_str()))
            .collect();

        identified
            .into_iter()
            .filter(|chunk| {
                if let Some(hash) = stored.get(&chunk.id) {
                    if *hash != content_hash(chunk.text()) {
                        debug!(
                            "Chunk {} changed since it was indexed; keeping stored version",
                            chunk.id
                        );
                        report.changed += 1;
                    }
                    report.skipped += 1;
                    return false;
                }
                if chunk.is_blank() {
                    debug!("Skipping blank chunk {}", chunk.id);
                    report.blank += 1;
                    return false;
                }
                true
            })
            .collect()
    }

    fn embed(&self, chunks: Vec<IdentifiedChunk>) -> Result<Vec<VectorRecord>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text().to_string()).collect();
        let vectors = embed_in_batches(self.embedder, &texts, self.config.embedding.batch_size)
            .map_err(|e| {
                warn!("Embedding failed, index left unchanged: {}", e);
                e
            })?;

        Ok(chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| VectorRecord::from_chunk(chunk, vector))
            .collect())
    }
}

/// Build or update the index at `index_path` from `source_dir`
pub fn build_index(
    source_dir: &Path,
    index_path: &Path,
    reset: bool,
    config: &Config,
    loader: &dyn DocumentLoader,
    embedder: &dyn EmbeddingProvider,
) -> Result<BuildReport> {
    Indexer::new(config, loader, embedder).build(source_dir, index_path, reset)
}
