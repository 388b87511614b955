use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{RagError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every violation
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_paths(config, &mut errors);
        Self::validate_chunking(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_index(config, &mut errors);
        Self::validate_retrieval(config, &mut errors);
        Self::validate_llm(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RagError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_paths(config: &Config, errors: &mut Vec<ValidationError>) {
        // Existence is checked by the commands that need the path; the data
        // directory may not exist yet when only querying.
        if config.paths.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "paths.data_dir",
                "Data directory cannot be empty",
            ));
        }

        if config.paths.index_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "paths.index_dir",
                "Index directory cannot be empty",
            ));
        }
    }

    fn validate_chunking(config: &Config, errors: &mut Vec<ValidationError>) {
        let chunking = &config.chunking;
        if chunking.max_length == 0 {
            errors.push(ValidationError::new(
                "chunking.max_length",
                "Maximum chunk length must be greater than 0",
            ));
        }

        if chunking.overlap >= chunking.max_length {
            errors.push(ValidationError::new(
                "chunking.overlap",
                format!(
                    "Overlap ({}) must be smaller than max_length ({})",
                    chunking.overlap, chunking.max_length
                ),
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.embedding.batch_size == 0 {
            errors.push(ValidationError::new(
                "embedding.batch_size",
                "Batch size must be greater than 0",
            ));
        }

        if config.embedding.model.is_empty() {
            errors.push(ValidationError::new(
                "embedding.model",
                "Model name cannot be empty",
            ));
        }
    }

    fn validate_index(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.index.hnsw_ef_construction == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_ef_construction",
                "HNSW ef_construction must be greater than 0",
            ));
        }

        if config.index.hnsw_m == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_m",
                "HNSW M must be greater than 0",
            ));
        }

        if config.index.hnsw_ef_search == 0 {
            errors.push(ValidationError::new(
                "index.hnsw_ef_search",
                "HNSW ef_search must be greater than 0",
            ));
        }
    }

    fn validate_retrieval(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.retrieval.top_k == 0 {
            errors.push(ValidationError::new(
                "retrieval.top_k",
                "top_k must be greater than 0",
            ));
        }
    }

    fn validate_llm(config: &Config, errors: &mut Vec<ValidationError>) {
        let temp = config.llm.temperature;
        if !(0.0..=2.0).contains(&temp) {
            errors.push(ValidationError::new(
                "llm.temperature",
                format!("Temperature must be between 0.0 and 2.0, got {}", temp),
            ));
        }

        let provider = &config.llm.provider;
        let valid_providers = ["ollama"];
        if !valid_providers.contains(&provider.as_str()) {
            errors.push(ValidationError::new(
                "llm.provider",
                format!(
                    "Provider must be one of {:?}, got '{}'",
                    valid_providers, provider
                ),
            ));
        }

        let endpoint = &config.llm.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            errors.push(ValidationError::new(
                "llm.endpoint",
                format!("Endpoint must be an http(s) URL, got '{}'", endpoint),
            ));
        }
    }
}
