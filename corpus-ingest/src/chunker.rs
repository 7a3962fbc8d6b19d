//! Deterministic overlapping text chunking.
//!
//! Splits normalized text into a finite ordered sequence of character
//! windows. Window ends prefer natural separators (paragraph break, newline,
//! sentence end, word break) over mid-word cuts, falling back to a hard cut
//! only when a window contains no separator at all. Consecutive windows
//! overlap by a fixed number of characters so that context spanning a
//! boundary survives retrieval.
//!
//! Chunks are emitted untrimmed: concatenating them while dropping each
//! successor's overlap prefix reconstructs the input exactly, and chunk
//! identity (`chunk_<index>`) stays stable across re-ingestion runs.

use crate::errors::IngestError;

/// Chunking parameters, measured in characters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Overlap carried into the next chunk; must be smaller than
    /// `chunk_size`.
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkParams {
    /// Validates parameter invariants.
    ///
    /// # Errors
    /// Returns `IngestError::Config` when `chunk_size` is zero or the
    /// overlap is not strictly smaller than the chunk size.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::Config("chunk_size must be > 0".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(IngestError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits `text` into overlapping chunks according to `params`.
///
/// Properties (hold for any input):
/// - deterministic: same input and params → same sequence;
/// - every chunk has at most `chunk_size` characters;
/// - empty input → empty sequence; input shorter than `chunk_size` → one
///   chunk equal to the input;
/// - when a chunk is longer than the overlap, the next chunk starts exactly
///   `overlap` characters before its end.
pub fn split_text(text: &str, params: &ChunkParams) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let size = params.chunk_size;
    let overlap = params.overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let window_end = (start + size).min(chars.len());
        let end = if window_end == chars.len() {
            window_end
        } else {
            break_point(&chars, start, window_end)
        };

        chunks.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }

        // Step back by the overlap, but always make forward progress even
        // when a separator cut produced a chunk shorter than the overlap.
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    chunks
}

/// Picks the cut position for a window that does not reach the end of the
/// input. Separator classes in preference order: paragraph break, newline,
/// sentence end, word break. Within a class the latest occurrence wins so
/// windows stay as full as possible. No separator → hard cut at the window
/// end.
fn break_point(chars: &[char], start: usize, window_end: usize) -> usize {
    debug_assert!(window_end > start);

    let mut paragraph = None;
    let mut line = None;
    let mut sentence = None;
    let mut word = None;

    for i in start..window_end {
        let c = chars[i];
        if c == '\n' {
            if i + 1 < window_end && chars[i + 1] == '\n' {
                paragraph = Some(i + 2);
            }
            line = Some(i + 1);
        } else if matches!(c, '.' | '!' | '?') {
            // Sentence end only when followed by whitespace (or input end),
            // so "3.14" is not a boundary.
            if chars.get(i + 1).is_none_or(|n| n.is_whitespace()) {
                sentence = Some(i + 1);
            }
        } else if c.is_whitespace() {
            word = Some(i + 1);
        }
    }

    let cut = paragraph
        .or(line)
        .or(sentence)
        .or(word)
        .unwrap_or(window_end);
    if cut > start { cut } else { window_end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(chunk_size: usize, overlap: usize) -> ChunkParams {
        ChunkParams {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_text("", &params(10, 2)).is_empty());
    }

    #[test]
    fn short_input_yields_single_verbatim_chunk() {
        let out = split_text("tiny text", &params(100, 10));
        assert_eq!(out, vec!["tiny text".to_string()]);
    }

    #[test]
    fn chunks_never_exceed_size() {
        let text = "word ".repeat(500);
        for chunk in split_text(&text, &params(64, 16)) {
            assert!(chunk.chars().count() <= 64);
        }
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "The quick brown fox. Jumps over the lazy dog! Again and again?\n\nNew paragraph here.".repeat(20);
        let p = params(80, 20);
        assert_eq!(split_text(&text, &p), split_text(&text, &p));
    }

    #[test]
    fn consecutive_chunks_share_the_overlap() {
        let text = "alpha beta gamma delta ".repeat(100);
        let p = params(100, 25);
        let chunks = split_text(&text, &p);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            if prev.len() > p.overlap {
                let suffix: String = prev[prev.len() - p.overlap..].iter().collect();
                let prefix: String = next[..p.overlap.min(next.len())].iter().collect();
                assert_eq!(suffix, prefix);
            }
        }
    }

    #[test]
    fn overlap_dropped_concatenation_reconstructs_input() {
        let text = "one two three four five six seven eight nine ten ".repeat(40);
        let p = params(120, 30);
        let chunks = split_text(&text, &p);
        let mut rebuilt: String = chunks[0].clone();
        for chunk in &chunks[1..] {
            let chars: Vec<char> = chunk.chars().collect();
            rebuilt.extend(&chars[p.overlap.min(chars.len())..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn prefers_paragraph_breaks_over_word_breaks() {
        let text = "first paragraph\n\nsecond paragraph that keeps going for a while";
        let chunks = split_text(&text, &params(30, 5));
        assert!(chunks[0].ends_with("\n\n"));
    }

    #[test]
    fn hard_cut_when_no_separator_in_window() {
        let text = "x".repeat(25);
        let chunks = split_text(&text, &params(10, 2));
        assert_eq!(chunks[0].len(), 10);
        assert!(chunks.iter().all(|c| c.len() <= 10));
    }

    #[test]
    fn tiny_document_scenario_shares_boundary_chars() {
        // "A. B. C." with size=4, overlap=1 → several chunks, each ≤ 4
        // chars, adjacent chunks sharing a boundary character.
        let chunks = split_text("A. B. C.", &params(4, 1));
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
        for pair in chunks.windows(2) {
            let prev_last = pair[0].chars().last().unwrap();
            let next_first = pair[1].chars().next().unwrap();
            assert_eq!(prev_last, next_first);
        }
    }

    #[test]
    fn validate_rejects_overlap_not_smaller_than_size() {
        assert!(params(10, 10).validate().is_err());
        assert!(params(0, 0).validate().is_err());
        assert!(params(10, 9).validate().is_ok());
    }
}
