//! ragindex - document index builder and retriever for retrieval-augmented QA
//!
//! Source documents are split into overlapping chunks with deterministic
//! identities, embedded, and merged into a persisted vector index that can be
//! rebuilt incrementally. At query time the chunks nearest to a question are
//! assembled into a grounding context for a language model.

pub mod chunking;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod indexer;
pub mod retrieval;

pub use error::{RagError, Result};
