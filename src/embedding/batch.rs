/// Batched embedding generation for the indexer
use super::{EmbeddingError, EmbeddingProvider};
use std::time::Instant;
use tracing::{debug, info};

/// Embed `texts` in slices of `batch_size`, preserving input order
///
/// All-or-nothing: the first failing batch aborts the run and nothing is
/// returned, so no chunk can reach the index without a vector.
pub fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if batch_size == 0 {
        return Err(EmbeddingError::InvalidInput(
            "Batch size must be greater than 0".to_string(),
        ));
    }

    let start = Instant::now();
    let total = texts.len();
    let expected_dim = provider.dimension();
    let mut vectors = Vec::with_capacity(total);

    info!(
        "Embedding {} chunks with {} (batch size {})",
        total,
        provider.model_name(),
        batch_size
    );

    for (batch_no, batch) in texts.chunks(batch_size).enumerate() {
        let embeddings = provider.embed_batch(batch)?;

        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embeddings.len(),
            });
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != expected_dim) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: expected_dim,
                actual: bad.len(),
            });
        }

        vectors.extend(embeddings);
        debug!(
            "Embedded batch {} ({}/{} chunks)",
            batch_no + 1,
            vectors.len(),
            total
        );
    }

    info!(
        "Embedding complete: {} vectors in {}ms",
        vectors.len(),
        start.elapsed().as_millis()
    );
    Ok(vectors)
}
