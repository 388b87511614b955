/// Deterministic chunk identity assignment
use super::{Chunk, IdentifiedChunk};
use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stable chunk key rendered as `source:page:chunk_index`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(source: &str, page: u32, chunk_index: usize) -> Self {
        Self(format!("{}:{}:{}", source, page, chunk_index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChunkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The `source:page` group a chunk belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub source: String,
    pub page: u32,
}

impl PageKey {
    pub fn of(chunk: &Chunk) -> Self {
        Self {
            source: chunk.source.clone(),
            page: chunk.page,
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.page)
    }
}

/// Accumulator of the identity fold
///
/// Holds the page of the previous chunk and the index the next chunk on that
/// page will receive. Pages that have been left are remembered so a page
/// that reappears later is rejected instead of being numbered from zero
/// again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFold {
    last_page: Option<PageKey>,
    next_index: usize,
    closed_pages: HashSet<PageKey>,
}

impl IdentityFold {
    pub fn last_page(&self) -> Option<&PageKey> {
        self.last_page.as_ref()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// One step of the fold
    pub fn advance(mut self, chunk: Chunk) -> Result<(Self, IdentifiedChunk)> {
        let key = PageKey::of(&chunk);
        let same_page = self.last_page.as_ref() == Some(&key);

        let chunk_index = if same_page {
            self.next_index
        } else {
            if self.closed_pages.contains(&key) {
                return Err(RagError::InvalidArgument(format!(
                    "chunks of page {} are not contiguous",
                    key
                )));
            }
            if let Some(previous) = self.last_page.replace(key) {
                self.closed_pages.insert(previous);
            }
            0
        };
        self.next_index = chunk_index + 1;

        let id = ChunkId::new(&chunk.source, chunk.page, chunk_index);
        Ok((
            self,
            IdentifiedChunk {
                id,
                chunk_index,
                chunk,
            },
        ))
    }
}

/// Attach identities to an ordered chunk sequence
///
/// This is a strictly sequential reduction: a chunk's index depends on the
/// chunk immediately before it.
pub fn assign_ids(chunks: Vec<Chunk>) -> Result<Vec<IdentifiedChunk>> {
    let capacity = chunks.len();
    let (_, identified) = chunks.into_iter().try_fold(
        (IdentityFold::default(), Vec::with_capacity(capacity)),
        |(fold, mut identified), chunk| {
            let (fold, next) = fold.advance(chunk)?;
            identified.push(next);
            Ok::<_, RagError>((fold, identified))
        },
    )?;
    Ok(identified)
}
