//! Source documents and the loaders that produce them
//!
//! A `Document` is one page of one source file. Loaders must return pages in
//! a stable order (files sorted by path, pages ascending) because chunk
//! identities are derived from that order.

use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Form feed separates pages in plain-text exports (e.g. `pdftotext`)
const PAGE_BREAK: char = '\u{000C}';

/// One page of a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source locator, the file path as discovered
    pub source: String,
    /// 0-based page number within the source
    pub page: u32,
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, page: u32, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page,
            text: text.into(),
        }
    }
}

/// Capability that turns a source location into page-tagged documents
pub trait DocumentLoader {
    fn load(&self, source_dir: &Path) -> Result<Vec<Document>>;
}

/// Recursively loads `.pdf`, `.txt` and `.md` files from a directory
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    extensions: Vec<String>,
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string(), "txt".to_string(), "md".to_string()],
        }
    }
}

impl DirectoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict loading to the given extensions (lowercase, without dot)
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Sorted matching files under `root`; an unreadable entry fails the walk
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| RagError::DocumentLoad {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if wanted {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_file(&self, path: &Path) -> Result<Vec<Document>> {
        let source = path.display().to_string();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        let pages = if is_pdf {
            pdf_extract::extract_text_by_pages(path).map_err(|e| RagError::DocumentLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            let bytes = fs::read(path)
                .map_err(|e| RagError::io(e, format!("Failed to read {}", path.display())))?;
            split_pages(&String::from_utf8_lossy(&bytes))
        };

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page, text)| Document::new(source.clone(), page as u32, text))
            .collect())
    }
}

impl DocumentLoader for DirectoryLoader {
    fn load(&self, source_dir: &Path) -> Result<Vec<Document>> {
        if !source_dir.is_dir() {
            return Err(RagError::InvalidArgument(format!(
                "Source directory does not exist: {}",
                source_dir.display()
            )));
        }

        let files = self.list_files(source_dir)?;
        if files.is_empty() {
            return Err(RagError::InvalidArgument(format!(
                "No documents ({}) found under {}",
                self.extensions.join(", "),
                source_dir.display()
            )));
        }

        let mut documents = Vec::new();
        for (i, file) in files.iter().enumerate() {
            tracing::debug!("Loading file {}/{}: {}", i + 1, files.len(), file.display());
            documents.extend(self.load_file(file)?);
        }

        tracing::info!(
            "Loaded {} pages from {} files under {}",
            documents.len(),
            files.len(),
            source_dir.display()
        );
        Ok(documents)
    }
}

fn split_pages(text: &str) -> Vec<String> {
    text.split(PAGE_BREAK).map(str::to_string).collect()
}
