//! Deterministic collaborators shared by the integration tests
#![allow(dead_code)]

use ragindex::config::Config;
use ragindex::documents::{Document, DocumentLoader};
use ragindex::embedding::{EmbeddingError, EmbeddingProvider};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const LETTERS_MODEL: &str = "letters";

/// Embeds text as its a-z letter counts
pub struct LetterEmbedder {
    name: String,
    fail_on: Option<String>,
    embedded: AtomicUsize,
}

impl LetterEmbedder {
    pub fn new() -> Self {
        Self::named(LETTERS_MODEL)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_on: None,
            embedded: AtomicUsize::new(0),
        }
    }

    /// Fail any batch containing a text with `marker`
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::new()
        }
    }

    /// Number of texts embedded so far
    pub fn embedded(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }
}

pub fn letter_vector(text: &str) -> Vec<f32> {
    let mut counts = vec![0.0f32; 26];
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() {
            counts[(c as u8 - b'a') as usize] += 1.0;
        }
    }
    counts
}

impl EmbeddingProvider for LetterEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(letter_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if let Some(marker) = &self.fail_on {
            if texts.iter().any(|t| t.contains(marker.as_str())) {
                return Err(EmbeddingError::GenerationError(format!(
                    "refusing to embed '{}'",
                    marker
                )));
            }
        }
        self.embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| letter_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        26
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Serves a fixed page list regardless of the source directory
pub struct StaticLoader {
    pub documents: Vec<Document>,
}

impl StaticLoader {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentLoader for StaticLoader {
    fn load(&self, _source_dir: &Path) -> ragindex::Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Defaults with small chunks and batches so tests exercise splitting
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.chunking.max_length = 40;
    config.chunking.overlap = 8;
    config.embedding.batch_size = 2;
    config
}
