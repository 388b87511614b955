/// Query-time retrieval against indexes built by the pipeline
mod common;

use common::{test_config, LetterEmbedder, StaticLoader};
use ragindex::config::Config;
use ragindex::documents::Document;
use ragindex::generation::{GenerationError, Generator};
use ragindex::index::{SearchStrategy, VectorIndex};
use ragindex::indexer::build_index;
use ragindex::retrieval::{query_index, Retriever};
use ragindex::RagError;
use std::path::Path;
use tempfile::TempDir;

fn build(config: &Config, index_path: &Path, documents: Vec<Document>) {
    build_index(
        Path::new("unused"),
        index_path,
        false,
        config,
        &StaticLoader::new(documents),
        &LetterEmbedder::new(),
    )
    .unwrap();
}

fn pets() -> Vec<Document> {
    vec![
        Document::new("pets.txt", 0, "cats"),
        Document::new("pets.txt", 1, "dogs"),
        Document::new("pets.txt", 2, "zebra zebra"),
    ]
}

#[test]
fn test_missing_index_is_not_found() {
    let temp = TempDir::new().unwrap();
    let result = query_index(
        &temp.path().join("nothing-here"),
        "question",
        3,
        &test_config(),
        &LetterEmbedder::new(),
    );
    assert!(matches!(result, Err(RagError::IndexNotFound { .. })));
}

#[test]
fn test_empty_index_returns_empty_context() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    VectorIndex::create_empty().save(&index_path).unwrap();

    let retrieved = query_index(
        &index_path,
        "anything at all",
        5,
        &test_config(),
        &LetterEmbedder::new(),
    )
    .unwrap();
    assert!(retrieved.ids.is_empty());
    assert_eq!(retrieved.context, "");
}

#[test]
fn test_closest_chunks_first() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let retrieved = query_index(&index_path, "cat", 2, &config, &LetterEmbedder::new()).unwrap();

    let ids: Vec<&str> = retrieved.ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["pets.txt:0:0", "pets.txt:1:0"]);
    assert_eq!(retrieved.context, format!("cats{}dogs", config.retrieval.separator));
    assert!(retrieved.hits[0].distance <= retrieved.hits[1].distance);
}

#[test]
fn test_k_larger_than_index() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let retrieved = query_index(&index_path, "zebra", 10, &config, &LetterEmbedder::new()).unwrap();
    assert_eq!(retrieved.ids.len(), 3);
    assert_eq!(retrieved.ids[0].as_str(), "pets.txt:2:0");
}

#[test]
fn test_custom_separator() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let mut config = test_config();
    config.retrieval.separator = " | ".to_string();
    build(&config, &index_path, pets());

    let retrieved = query_index(&index_path, "cat", 2, &config, &LetterEmbedder::new()).unwrap();
    assert_eq!(retrieved.context, "cats | dogs");
}

#[test]
fn test_hnsw_agrees_with_exact_on_small_index() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let mut hnsw_config = config.clone();
    hnsw_config.index.search = SearchStrategy::Hnsw;

    let exact = query_index(&index_path, "zebra", 1, &config, &LetterEmbedder::new()).unwrap();
    let approx = query_index(&index_path, "zebra", 1, &hnsw_config, &LetterEmbedder::new()).unwrap();
    assert_eq!(exact.ids, approx.ids);
}

#[test]
fn test_query_with_other_model_rejected() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let result = query_index(
        &index_path,
        "cat",
        1,
        &config,
        &LetterEmbedder::named("another"),
    );
    assert!(matches!(result, Err(RagError::EmbeddingModelMismatch { .. })));
}

#[test]
fn test_empty_question_rejected() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let result = query_index(&index_path, "  ", 3, &config, &LetterEmbedder::new());
    assert!(matches!(result, Err(RagError::InvalidArgument(_))));
}

struct PromptRecorder;

impl Generator for PromptRecorder {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "recorder"
    }
}

#[test]
fn test_answer_is_grounded_on_retrieved_chunks() {
    let temp = TempDir::new().unwrap();
    let index_path = temp.path().join("index");
    let config = test_config();
    build(&config, &index_path, pets());

    let embedder = LetterEmbedder::new();
    let retriever = Retriever::open(&index_path, &embedder, &config).unwrap();
    let answer = retriever.answer("dog", 1, &PromptRecorder).unwrap();

    assert!(answer.text.starts_with("Answer the question based only on the following context:\ndogs\n"));
    assert!(answer.text.ends_with("Answer the question based on the above context: dog"));
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].as_str(), "pets.txt:1:0");
}
