//! Chunking and deterministic chunk identity
//!
//! Documents are split into overlapping windows by [`RecursiveSplitter`] and
//! then named by [`assign_ids`], a single sequential fold over the ordered
//! chunk stream. Identity is a pure function of `(source, page, chunk_index)`.

mod identity;
mod splitter;

pub use identity::{assign_ids, ChunkId, IdentityFold, PageKey};
pub use splitter::{split_documents, RecursiveSplitter, DEFAULT_SEPARATORS};

use serde::{Deserialize, Serialize};

/// A bounded window of text taken from one page of one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
    pub page: u32,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            page,
        }
    }
}

/// A chunk with its identity attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedChunk {
    pub id: ChunkId,
    /// Position among chunks sharing the same `source:page`, 0-based
    pub chunk_index: usize,
    pub chunk: Chunk,
}

impl IdentifiedChunk {
    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    /// Whitespace-only chunks carry nothing worth embedding
    pub fn is_blank(&self) -> bool {
        self.chunk.text.trim().is_empty()
    }
}
