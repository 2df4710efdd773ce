//! Splits long documents into paragraph- or sentence-bounded chunks before
//! each is sent through the core pipeline, and recombines per-chunk issue
//! offsets into document-relative ones.
//!
//! This lives entirely outside [`crate::pipeline::Pipeline::process`]: the
//! core never sees a document longer than one chunk.

use crate::core::Issue;

/// A chunk of text with its offset in the original document.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChunk {
    /// The chunk's text.
    pub text: String,
    /// Char offset, in the original document, where this chunk begins.
    pub start_offset: usize,
    /// Char offset, in the original document, where this chunk ends.
    pub end_offset: usize,
    /// Index of the paragraph this chunk was extracted from.
    pub paragraph_index: usize,
}

/// Splits documents into chunks no longer than `max_chunk_size` chars.
pub struct Chunker {
    max_chunk_size: usize,
}

impl Chunker {
    /// Build a chunker with the given maximum chunk size.
    #[must_use]
    pub fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    /// Split `text` into chunks, preserving paragraph and offset
    /// information needed to recombine results later.
    #[must_use]
    pub fn chunk_text(&self, text: &str) -> Vec<TextChunk> {
        if text.chars().count() <= self.max_chunk_size {
            return vec![TextChunk {
                text: text.to_string(),
                start_offset: 0,
                end_offset: text.chars().count(),
                paragraph_index: 0,
            }];
        }

        let paragraphs = split_paragraphs(text);
        let mut chunks = Vec::new();
        let mut offset = 0usize;

        for (para_idx, paragraph) in paragraphs.iter().enumerate() {
            let para_len = paragraph.chars().count();
            if para_len <= self.max_chunk_size {
                chunks.push(TextChunk {
                    text: (*paragraph).to_string(),
                    start_offset: offset,
                    end_offset: offset + para_len,
                    paragraph_index: para_idx,
                });
            } else {
                chunks.extend(self.split_by_sentences(paragraph, offset, para_idx));
            }

            offset += para_len;
            if para_idx + 1 < paragraphs.len() {
                offset += 2; // the "\n\n" separator
            }
        }

        chunks
    }

    fn split_by_sentences(
        &self,
        text: &str,
        base_offset: usize,
        paragraph_index: usize,
    ) -> Vec<TextChunk> {
        let sentences = split_sentences(text);
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut chunk_start = base_offset;

        for sentence in sentences {
            if current.chars().count() + sentence.chars().count() <= self.max_chunk_size {
                current.push_str(sentence);
                current.push(' ');
            } else {
                if !current.is_empty() {
                    let trimmed = current.trim();
                    chunks.push(TextChunk {
                        text: trimmed.to_string(),
                        start_offset: chunk_start,
                        end_offset: chunk_start + trimmed.chars().count(),
                        paragraph_index,
                    });
                    chunk_start += current.chars().count();
                }
                current = format!("{sentence} ");
            }
        }

        let trimmed = current.trim();
        if !trimmed.is_empty() {
            chunks.push(TextChunk {
                text: trimmed.to_string(),
                start_offset: chunk_start,
                end_offset: chunk_start + trimmed.chars().count(),
                paragraph_index,
            });
        }

        chunks
    }

    /// Recombine chunks back into a single document, restoring paragraph
    /// separators between chunks that belonged to different paragraphs.
    #[must_use]
    pub fn merge_chunks(chunks: &[TextChunk]) -> String {
        let mut sorted: Vec<&TextChunk> = chunks.iter().collect();
        sorted.sort_by_key(|c| c.start_offset);

        let mut result = String::new();
        let mut prev_paragraph: Option<usize> = None;

        for chunk in sorted {
            if let Some(prev) = prev_paragraph {
                if chunk.paragraph_index != prev {
                    result.push_str("\n\n");
                } else if !result.is_empty() {
                    result.push(' ');
                }
            }
            result.push_str(&chunk.text);
            prev_paragraph = Some(chunk.paragraph_index);
        }

        result
    }

    /// Translate chunk-relative issue offsets into document-relative ones.
    #[must_use]
    pub fn adjust_issue_offsets(issues: Vec<Issue>, chunk: &TextChunk) -> Vec<Issue> {
        issues
            .into_iter()
            .map(|mut issue| {
                issue.offset += chunk.start_offset;
                issue
            })
            .collect()
    }
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Split on a terminal `.`, `!`, or `?` followed by whitespace and an
/// uppercase letter. This is not abbreviation-aware: "Dr. Smith" still
/// splits after "Dr.".
fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut boundaries = Vec::new();

    for window in chars.windows(3) {
        let [(_, a), (byte_idx, b), (_, c)] = window else {
            continue;
        };
        if matches!(a, '.' | '!' | '?') && b.is_whitespace() && c.is_uppercase() {
            boundaries.push(*byte_idx + b.len_utf8());
        }
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in boundaries {
        sentences.push(text[start..boundary].trim());
        start = boundary;
    }
    sentences.push(text[start..].trim());
    sentences.into_iter().filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunker = Chunker::new(100);
        let chunks = chunker.chunk_text("short text");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn test_long_text_splits_on_paragraphs() {
        let chunker = Chunker::new(10);
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = chunker.chunk_text(text);
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn test_merge_chunks_reproduces_paragraph_structure() {
        let chunks = vec![
            TextChunk {
                text: "First paragraph.".to_string(),
                start_offset: 0,
                end_offset: 16,
                paragraph_index: 0,
            },
            TextChunk {
                text: "Second paragraph.".to_string(),
                start_offset: 18,
                end_offset: 35,
                paragraph_index: 1,
            },
        ];
        let merged = Chunker::merge_chunks(&chunks);
        assert_eq!(merged, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_adjust_issue_offsets_shifts_by_chunk_start() {
        let chunk = TextChunk {
            text: "x".to_string(),
            start_offset: 50,
            end_offset: 51,
            paragraph_index: 0,
        };
        let issue = Issue {
            offset: 3,
            length: 1,
            message: "m".to_string(),
            rule_id: "R".to_string(),
            category: crate::core::Category::Grammar,
            severity: crate::core::Severity::Error,
            original_span: "x".to_string(),
            suggestions: vec![],
            context: None,
        };
        let adjusted = Chunker::adjust_issue_offsets(vec![issue], &chunk);
        assert_eq!(adjusted[0].offset, 53);
    }

    #[test]
    fn test_split_sentences_on_terminal_punctuation() {
        // The heuristic splits on any `. `/`! `/`? ` followed by an
        // uppercase letter, so "Dr. Smith" is split like any other
        // sentence boundary -- this is a known, documented limitation,
        // not a true abbreviation-aware sentence splitter.
        let sentences = split_sentences("He said hello. She replied warmly.");
        assert_eq!(sentences, vec!["He said hello.", "She replied warmly."]);
    }
}
