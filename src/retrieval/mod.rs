//! Query-time retrieval
//!
//! Load an index, embed the question with the same provider that built it,
//! take the nearest chunks and join them into a grounding context.

mod prompt;

pub use prompt::PromptTemplate;

use crate::chunking::ChunkId;
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::index::{SearchHit, SearchOptions, VectorIndex};
use serde::Serialize;
use std::path::Path;

/// Context assembled for one question
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievedContext {
    /// Chunk texts, closest first, joined with the separator
    pub context: String,
    /// Identities of the chunks in `context`, same order
    pub ids: Vec<ChunkId>,
    pub hits: Vec<SearchHit>,
}

impl RetrievedContext {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A generated answer and the chunks it was grounded on
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<ChunkId>,
}

pub struct Retriever<'a> {
    index: VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
    separator: String,
    template: PromptTemplate,
}

impl<'a> Retriever<'a> {
    pub fn new(index: VectorIndex, embedder: &'a dyn EmbeddingProvider, separator: &str) -> Self {
        Self {
            index,
            embedder,
            separator: separator.to_string(),
            template: PromptTemplate::default(),
        }
    }

    /// Load the index at `index_path`; a missing index is `IndexNotFound`
    pub fn open(
        index_path: &Path,
        embedder: &'a dyn EmbeddingProvider,
        config: &Config,
    ) -> Result<Self> {
        let options = SearchOptions::from_config(&config.index);
        let index = VectorIndex::load(index_path, options)?;

        if let Some(model) = index.embedding_model() {
            if model != embedder.model_name() {
                return Err(RagError::EmbeddingModelMismatch {
                    index: model.to_string(),
                    provider: embedder.model_name().to_string(),
                });
            }
        }

        Ok(Self::new(index, embedder, &config.retrieval.separator))
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// The `k` chunks closest to `question`
    pub fn retrieve(&self, question: &str, k: usize) -> Result<RetrievedContext> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidArgument(
                "question cannot be empty".to_string(),
            ));
        }
        if k == 0 {
            return Err(RagError::InvalidArgument(
                "k must be greater than 0".to_string(),
            ));
        }
        if self.index.is_empty() {
            tracing::info!("Index is empty, no context for question");
            return Ok(RetrievedContext::default());
        }

        let query = self.embedder.embed(question)?;
        let hits = self.index.search(&query, k)?;

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join(self.separator.as_str());
        let ids = hits.iter().map(|hit| hit.id.clone()).collect();

        tracing::debug!("Retrieved {} chunks for question", hits.len());
        Ok(RetrievedContext { context, ids, hits })
    }

    /// Render the grounding prompt for `question`
    pub fn prompt(&self, question: &str, k: usize) -> Result<(String, RetrievedContext)> {
        let retrieved = self.retrieve(question, k)?;
        let prompt = self.template.render(&retrieved.context, question);
        Ok((prompt, retrieved))
    }

    /// Retrieve, render, generate
    pub fn answer(&self, question: &str, k: usize, generator: &dyn Generator) -> Result<Answer> {
        let (prompt, retrieved) = self.prompt(question, k)?;
        tracing::info!(
            "Generating answer with {} from {} chunks",
            generator.model_name(),
            retrieved.ids.len()
        );
        let text = generator.generate(&prompt)?;
        Ok(Answer {
            text,
            sources: retrieved.ids,
        })
    }
}

/// Load the index and retrieve context for one question
pub fn query_index(
    index_path: &Path,
    question: &str,
    k: usize,
    config: &Config,
    embedder: &dyn EmbeddingProvider,
) -> Result<RetrievedContext> {
    Retriever::open(index_path, embedder, config)?.retrieve(question, k)
}
