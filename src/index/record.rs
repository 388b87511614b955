//! Records stored in the vector index

use crate::chunking::{ChunkId, IdentifiedChunk};
use serde::{Deserialize, Serialize};

/// Structured per-record metadata
///
/// `content_hash` is the only field beyond chunk provenance; new fields go
/// here explicitly rather than into a free-form map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source: String,
    pub page: u32,
    pub chunk_index: usize,
    /// BLAKE3 hex digest of the chunk text
    pub content_hash: String,
}

impl RecordMetadata {
    pub fn for_chunk(chunk: &IdentifiedChunk) -> Self {
        Self {
            source: chunk.chunk.source.clone(),
            page: chunk.chunk.page,
            chunk_index: chunk.chunk_index,
            content_hash: content_hash(&chunk.chunk.text),
        }
    }
}

/// One embedded chunk
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: ChunkId,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    pub fn from_chunk(chunk: IdentifiedChunk, vector: Vec<f32>) -> Self {
        let metadata = RecordMetadata::for_chunk(&chunk);
        Self {
            id: chunk.id,
            vector,
            text: chunk.chunk.text,
            metadata,
        }
    }
}

pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
