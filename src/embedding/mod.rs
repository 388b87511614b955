/// Embedding capability
///
/// - `EmbeddingProvider` trait for abstraction over backends
/// - `FastEmbedProvider` for local embedding (all-MiniLM-L6-v2, 384-dim)
/// - `embed_in_batches` for all-or-nothing batched generation
mod batch;
mod provider;

pub use batch::embed_in_batches;
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
