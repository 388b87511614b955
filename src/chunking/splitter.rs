/// Recursive separator splitter
///
/// Tries paragraph breaks first, then line breaks, then spaces, and only
/// cuts between arbitrary characters when none of those occur. All lengths
/// are counted in chars, not bytes.
use super::Chunk;
use crate::config::ChunkingConfig;
use crate::documents::Document;
use crate::error::{RagError, Result};
use std::collections::VecDeque;

/// Separators in order of preference; `""` means a hard cut between chars
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    max_length: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        if config.max_length == 0 {
            return Err(RagError::InvalidArgument(
                "max_length must be greater than 0".to_string(),
            ));
        }
        if config.overlap >= config.max_length {
            return Err(RagError::InvalidArgument(format!(
                "overlap ({}) must be smaller than max_length ({})",
                config.overlap, config.max_length
            )));
        }

        Ok(Self {
            max_length: config.max_length,
            overlap: config.overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split one text into ordered windows
    ///
    /// Text that already fits (including empty text) comes back unchanged as
    /// a single window.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.max_length {
            return vec![text.to_string()];
        }
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, remaining) = pick_separator(text, separators);

        let mut windows = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.max_length {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                windows.extend(self.merge(&pending));
                pending.clear();
            }

            if remaining.is_empty() {
                if let Some(window) = trimmed(piece) {
                    windows.push(window);
                }
            } else {
                windows.extend(self.split_recursive(piece, remaining));
            }
        }

        if !pending.is_empty() {
            windows.extend(self.merge(&pending));
        }

        windows
    }

    /// Greedily pack short pieces into windows, carrying up to `overlap`
    /// chars of trailing pieces into the next window.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut windows = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.max_length && !current.is_empty() {
                if let Some(window) = join(&current) {
                    windows.push(window);
                }

                while total > self.overlap || (total > 0 && total + len > self.max_length) {
                    match current.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(window) = join(&current) {
            windows.push(window);
        }

        windows
    }
}

/// Split every document in order, copying source and page onto each chunk
pub fn split_documents(documents: &[Document], config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    let splitter = RecursiveSplitter::new(config)?;

    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|doc| {
            splitter
                .split_text(&doc.text)
                .into_iter()
                .map(move |text| Chunk::new(text, doc.source.clone(), doc.page))
        })
        .collect();

    tracing::debug!(
        "Split {} documents into {} chunks (max_length={}, overlap={})",
        documents.len(),
        chunks.len(),
        config.max_length,
        config.overlap
    );
    Ok(chunks)
}

fn pick_separator<'s>(text: &str, separators: &'s [String]) -> (&'s str, &'s [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[i + 1..]);
        }
    }
    match separators.last() {
        Some(last) => (last.as_str(), &[]),
        None => ("", &[]),
    }
}

/// Split on `separator`, keeping it attached to the start of the following piece
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    trimmed(&joined)
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(max_length: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(&ChunkingConfig {
            max_length,
            overlap,
        })
        .unwrap()
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let s = splitter(100, 10);
        assert_eq!(s.split_text("  short text  "), vec!["  short text  "]);
    }

    #[test]
    fn test_empty_text_is_single_empty_chunk() {
        let s = splitter(100, 10);
        assert_eq!(s.split_text(""), vec![""]);
    }

    #[test]
    fn test_word_boundaries_without_overlap() {
        let s = splitter(10, 0);
        assert_eq!(s.split_text("aaaa bbbb cccc"), vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_word_boundaries_with_overlap() {
        let s = splitter(10, 5);
        assert_eq!(
            s.split_text("aaaa bbbb cccc"),
            vec!["aaaa bbbb", "bbbb cccc"]
        );
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let s = splitter(20, 0);
        let text = "first paragraph\n\nsecond paragraph";
        assert_eq!(s.split_text(text), vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_hard_cut_when_no_boundary() {
        let s = splitter(5, 0);
        assert_eq!(
            s.split_text("abcdefghijklmnop"),
            vec!["abcde", "fghij", "klmno", "p"]
        );

        let s = splitter(5, 2);
        let windows = s.split_text("abcdefghijklmnop");
        assert_eq!(&windows[..2], &["abcde", "defgh"]);
    }

    #[test]
    fn test_windows_respect_max_length() {
        let s = splitter(50, 10);
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let windows = s.split_text(&text);

        assert!(windows.len() > 1);
        for window in &windows {
            assert!(window.chars().count() <= 50, "window too long: {window:?}");
            assert!(!window.is_empty());
        }
    }

    #[test]
    fn test_multibyte_characters_counted_as_chars() {
        let s = splitter(4, 0);
        let windows = s.split_text("äöüßäöüß");
        assert_eq!(windows, vec!["äöüß", "äöüß"]);
    }

    #[test]
    fn test_invalid_parameters() {
        let zero = RecursiveSplitter::new(&ChunkingConfig {
            max_length: 0,
            overlap: 0,
        });
        assert!(matches!(zero, Err(RagError::InvalidArgument(_))));

        let overlap = RecursiveSplitter::new(&ChunkingConfig {
            max_length: 10,
            overlap: 10,
        });
        assert!(matches!(overlap, Err(RagError::InvalidArgument(_))));
    }

    #[test]
    fn test_split_documents_preserves_order_and_origin() {
        let docs = vec![
            Document::new("a.pdf", 1, "aaaa bbbb cccc"),
            Document::new("a.pdf", 2, "dddd"),
        ];
        let chunks = split_documents(
            &docs,
            &ChunkingConfig {
                max_length: 10,
                overlap: 0,
            },
        )
        .unwrap();

        let summary: Vec<(&str, u32, &str)> = chunks
            .iter()
            .map(|c| (c.source.as_str(), c.page, c.text.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.pdf", 1, "aaaa bbbb"),
                ("a.pdf", 1, "cccc"),
                ("a.pdf", 2, "dddd"),
            ]
        );
    }
}
