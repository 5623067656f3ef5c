//! PDF text extraction and chunking
//!
//! Extraction is delegated to the `pdf-extract` crate. A missing or corrupt
//! PDF is a real error surfaced to the caller; unlike the advisory client
//! there is no fallback here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FarecastError;
use crate::Result;

/// Window size of a chunk, in characters
pub const CHUNK_SIZE: usize = 1000;

/// Overlap between consecutive chunks, in characters
pub const CHUNK_OVERLAP: usize = 200;

/// A bounded, overlapping slice of a document's extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Where a chunk came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// File the chunk was extracted from
    pub source: String,
    /// 1-based page number
    pub page: usize,
}

/// PDF processor with fixed-size overlapping chunking
#[derive(Debug, Clone, Copy)]
pub struct PdfProcessor {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
        }
    }
}

impl PdfProcessor {
    /// Create a processor with explicit window parameters.
    ///
    /// `chunk_size` must be larger than `chunk_overlap` or the window
    /// would never advance.
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > chunk_overlap, "chunk size must exceed overlap");
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Extract raw text, pages joined with newline separators
    pub fn extract_text(&self, path: &Path) -> Result<String> {
        let pages = load_pages(path)
            .map_err(|e| FarecastError::document(format!("Error extracting text from PDF: {e}")))?;
        Ok(pages.join("\n"))
    }

    /// Extract text and split it into overlapping chunks with page metadata
    pub fn process(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        let pages = load_pages(path)
            .map_err(|e| FarecastError::document(format!("Error processing PDF: {e}")))?;

        let source = path.display().to_string();
        let mut chunks = Vec::new();

        for (index, page) in pages.iter().enumerate() {
            for window in split_windows(page.trim(), self.chunk_size, self.chunk_overlap) {
                chunks.push(DocumentChunk {
                    content: window,
                    metadata: ChunkMetadata {
                        source: source.clone(),
                        page: index + 1,
                    },
                });
            }
        }

        Ok(chunks)
    }
}

fn load_pages(path: &Path) -> std::result::Result<Vec<String>, pdf_extract::OutputError> {
    pdf_extract::extract_text_by_pages(path)
}

/// Split text into fixed-size windows overlapping by `overlap` characters.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point. Empty text produces no windows.
fn split_windows(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = size - overlap;
    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_short_text_is_a_single_window() {
        let windows = split_windows("hello world", 1000, 200);
        assert_eq!(windows, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_empty_text_has_no_windows() {
        assert!(split_windows("", 1000, 200).is_empty());
    }

    #[rstest]
    #[case(10, 2, "abcdefghijklmnop", vec!["abcdefghij", "ijklmnop"])]
    #[case(4, 2, "abcdef", vec!["abcd", "cdef"])]
    #[case(6, 0, "abcdefgh", vec!["abcdef", "gh"])]
    fn test_windows_overlap_by_configured_amount(
        #[case] size: usize,
        #[case] overlap: usize,
        #[case] text: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(split_windows(text, size, overlap), expected);
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        // 4 two-byte characters; a byte split would panic
        let windows = split_windows("éééé", 3, 1);
        assert_eq!(windows, vec!["ééé".to_string(), "éé".to_string()]);
    }

    #[test]
    fn test_missing_file_is_a_document_error() {
        let processor = PdfProcessor::default();
        let err = processor
            .extract_text(Path::new("/nonexistent/file.pdf"))
            .unwrap_err();
        assert!(matches!(err, FarecastError::Document { .. }));
        assert!(err.to_string().contains("Error extracting text from PDF"));
    }

    #[test]
    #[should_panic(expected = "chunk size must exceed overlap")]
    fn test_overlap_must_be_smaller_than_size() {
        let _ = PdfProcessor::new(100, 100);
    }
}
