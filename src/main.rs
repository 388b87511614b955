use ragindex::cli::{Cli, Commands, ConfigAction};
use ragindex::config::{Config, ConfigValidator};
use ragindex::documents::DirectoryLoader;
use ragindex::embedding::FastEmbedProvider;
use ragindex::error::{RagError, Result};
use ragindex::generation::OllamaGenerator;
use ragindex::index::{SearchOptions, VectorIndex};
use ragindex::indexer::build_index;
use ragindex::retrieval::Retriever;
use std::path::{Path, PathBuf};

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            source,
            index,
            reset,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_build(&config, source, index, reset)?;
        }
        Commands::Query {
            question,
            k,
            index,
            json,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_query(&config, &question, k, index, json)?;
        }
        Commands::Ask { question, k, index } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_ask(&config, &question, k, index)?;
        }
        Commands::Status { index, json } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_status(&config, index, json)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "ragindex=debug"
    } else {
        "ragindex=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(
    config: &Config,
    source: Option<PathBuf>,
    index: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    let source_dir = expand_path(source.as_deref().unwrap_or(&config.paths.data_dir))?;
    let index_path = index_path(config, index)?;

    let embedder = embedder(config)?;
    let report = build_index(
        &source_dir,
        &index_path,
        reset,
        config,
        &DirectoryLoader::new(),
        &embedder,
    )?;

    println!("{}", report);
    println!(
        "  Pages: {}  Chunks: {}  Skipped: {} ({} changed)  Blank: {}",
        report.documents, report.chunks, report.skipped, report.changed, report.blank
    );
    println!(
        "  Index: {} ({} records, generation {})",
        index_path.display(),
        report.total_records,
        report.generation
    );
    Ok(())
}

fn cmd_query(
    config: &Config,
    question: &str,
    k: Option<usize>,
    index: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let index_path = index_path(config, index)?;
    let embedder = embedder(config)?;
    let retriever = Retriever::open(&index_path, &embedder, config)?;
    let retrieved = retriever.retrieve(question, k.unwrap_or(config.retrieval.top_k))?;

    if json {
        println!("{}", to_json(&retrieved, "Failed to serialize results")?);
        return Ok(());
    }

    if retrieved.is_empty() {
        println!("No results (index is empty)");
        return Ok(());
    }

    for hit in &retrieved.hits {
        println!("{}. {} (distance {:.4})", hit.rank + 1, hit.id, hit.distance);
        for line in hit.text.lines().take(3) {
            println!("   {}", line);
        }
    }
    Ok(())
}

fn cmd_ask(config: &Config, question: &str, k: Option<usize>, index: Option<PathBuf>) -> Result<()> {
    let index_path = index_path(config, index)?;
    let embedder = embedder(config)?;
    let generator = OllamaGenerator::from_config(&config.llm)?;

    let retriever = Retriever::open(&index_path, &embedder, config)?;
    let answer = retriever.answer(question, k.unwrap_or(config.retrieval.top_k), &generator)?;

    println!("{}", answer.text.trim());
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for id in &answer.sources {
            println!("  - {}", id);
        }
    }
    Ok(())
}

fn cmd_status(config: &Config, index: Option<PathBuf>, json: bool) -> Result<()> {
    let index_path = index_path(config, index)?;
    let index = VectorIndex::load(&index_path, SearchOptions::from_config(&config.index))?;
    let stats = index.stats();

    if json {
        println!("{}", to_json(&stats, "Failed to serialize status")?);
        return Ok(());
    }

    println!("ragindex Status");
    println!("===============");
    println!("\nIndex: {}", index_path.display());
    println!("  Records: {}", stats.record_count);
    println!(
        "  Dimension: {}",
        stats
            .dimension
            .map_or_else(|| "unset".to_string(), |d| d.to_string())
    );
    println!(
        "  Embedding model: {}",
        stats.embedding_model.as_deref().unwrap_or("unset")
    );
    println!("  Generation: {}", stats.generation);
    if let Some(updated) = stats.updated_at {
        println!("  Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    if !stats.records_per_source.is_empty() {
        println!("\nSources:");
        for (source, count) in &stats.records_per_source {
            println!("  {} - {} chunks", source, count);
        }
    }
    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            println!("{}", to_json(&config, "Failed to serialize config")?);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| RagError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let explicit = config_path.is_some();
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        if explicit {
            return Err(RagError::ConfigNotFound { path });
        }
        tracing::warn!(
            "Config file not found, using defaults. Run 'ragindex config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        ConfigValidator::validate(&config)?;
        return Ok(config);
    }

    if let Some(profile) = profile {
        Config::load_with_profile(&path, &profile)
    } else {
        Config::load(&path)
    }
}

fn embedder(config: &Config) -> Result<FastEmbedProvider> {
    let cache_dir = match &config.embedding.cache_dir {
        Some(dir) => Some(expand_path(dir)?),
        None => None,
    };
    Ok(FastEmbedProvider::new(&config.embedding.model, cache_dir)?)
}

fn index_path(config: &Config, index: Option<PathBuf>) -> Result<PathBuf> {
    expand_path(index.as_deref().unwrap_or(&config.paths.index_dir))
}

fn to_json<T: serde::Serialize>(value: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| RagError::Json {
        source: e,
        context: context.to_string(),
    })
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| RagError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| RagError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
