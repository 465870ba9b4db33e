//! Inverted index port and an in-memory implementation.
//!
//! Generators never look at postings lists directly. Everything they need is
//! behind the [`InvertedIndex`] trait: strict `next`/`prev` navigation over a
//! token's positions plus the corpus length. Any storage engine can implement
//! it; [`MemoryIndex`] is the reference implementation used by the CLI and
//! the tests.
//!
//! ## Architecture
//!
//! `MemoryIndex` keeps:
//! - The token stream as a `Vec<String>` for snippet display
//! - A `HashMap<String, Vec<Position>>` of sorted postings lists
//!
//! Both are immutable once built, so an index can be shared between threads
//! behind an `Arc` without locking.

use crate::error::{GclError, Result};
use crate::types::{Position, NEG_INF, POS_INF};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Navigation primitives over a positional inverted index.
///
/// Both navigation methods are strict (the given position is excluded) and
/// total: when nothing qualifies they return the sentinel for their
/// direction instead of failing. Sentinels are valid inputs:
/// `next(t, NEG_INF)` is the first occurrence of `t` and
/// `prev(t, POS_INF)` the last.
pub trait InvertedIndex: Send + Sync {
    /// Smallest position `> position` carrying `token`, or `POS_INF`.
    fn next(&self, token: &str, position: Position) -> Position;

    /// Largest position `< position` carrying `token`, or `NEG_INF`.
    fn prev(&self, token: &str, position: Position) -> Position;

    /// Number of positions in the corpus.
    fn corpus_length(&self) -> Position;
}

/// Splits text into index tokens.
///
/// Every regex match becomes one token (one corpus position); text between
/// matches is discarded.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    lowercase: bool,
}

impl Tokenizer {
    /// Word characters form tokens, every other non-space character is a
    /// token of its own.
    pub const DEFAULT_PATTERN: &'static str = r"\w+|[^\w\s]";

    /// Create a tokenizer from a regex pattern.
    pub fn new(pattern: &str, lowercase: bool) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| GclError::ConfigError {
            reason: format!("invalid token pattern `{}`: {}", pattern, e),
        })?;
        Ok(Tokenizer { pattern, lowercase })
    }

    /// Normalize a single token the way indexed tokens were normalized.
    pub fn normalize(&self, token: &str) -> String {
        if self.lowercase {
            token.to_lowercase()
        } else {
            token.to_string()
        }
    }

    /// Tokenize `text` in order of appearance.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.pattern
            .find_iter(text)
            .map(move |m| self.normalize(m.as_str()))
    }
}

/// Statistics about an index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of positions in the corpus
    pub corpus_length: u64,

    /// Number of distinct tokens
    pub vocabulary: u64,

    /// Total number of postings across all tokens
    pub postings: u64,
}

/// An immutable in-memory positional index.
///
/// ## Example
///
/// ```rust
/// use gcl_core::{InvertedIndex, MemoryIndex, POS_INF};
///
/// let index = MemoryIndex::from_tokens(["the", "cat", "sat", "on", "the", "mat"]);
/// assert_eq!(index.next("the", 0), 4);
/// assert_eq!(index.next("the", 4), POS_INF);
/// assert_eq!(index.prev("cat", 5), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    /// Token at each position (empty when built from bare postings)
    tokens: Vec<String>,

    /// Sorted positions per token
    postings: HashMap<String, Vec<Position>>,
}

impl MemoryIndex {
    /// Build an index from a token stream; the i-th token sits at position i.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut postings: HashMap<String, Vec<Position>> = HashMap::new();

        for (position, token) in tokens.iter().enumerate() {
            postings
                .entry(token.clone())
                .or_default()
                .push(position as Position);
        }

        debug!(
            corpus_length = tokens.len(),
            vocabulary = postings.len(),
            "Built in-memory index"
        );

        MemoryIndex { tokens, postings }
    }

    /// Tokenize `text` and index the result.
    #[instrument(skip(text, tokenizer), fields(bytes = text.len()))]
    pub fn from_text(text: &str, tokenizer: &Tokenizer) -> Self {
        let index = Self::from_tokens(tokenizer.tokenize(text));
        info!(
            corpus_length = index.tokens.len(),
            vocabulary = index.postings.len(),
            "Indexed text"
        );
        index
    }

    /// Build an index directly from postings lists.
    ///
    /// Several tokens may share a position. Positions must lie inside
    /// `[0, corpus_length - 1]`; the token stream records the first token
    /// given for each position.
    pub fn from_postings<'a, I>(corpus_length: usize, postings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [Position])>,
    {
        let mut tokens = vec![String::new(); corpus_length];
        let mut lists: HashMap<String, Vec<Position>> = HashMap::new();

        for (token, positions) in postings {
            for &position in positions {
                if position < 0 || position as usize >= corpus_length {
                    return Err(GclError::invalid_argument(format!(
                        "position {} of `{}` outside corpus of length {}",
                        position, token, corpus_length
                    )));
                }
                let slot = &mut tokens[position as usize];
                if slot.is_empty() {
                    *slot = token.to_string();
                }
            }
            lists
                .entry(token.to_string())
                .or_default()
                .extend_from_slice(positions);
        }

        for list in lists.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        Ok(MemoryIndex {
            tokens,
            postings: lists,
        })
    }

    /// Number of positions in the corpus.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `position`, if the position is inside the corpus.
    pub fn token_at(&self, position: Position) -> Option<&str> {
        usize::try_from(position)
            .ok()
            .and_then(|p| self.tokens.get(p))
            .map(String::as_str)
    }

    /// Tokens covered by `[start, end]`, clamped to the corpus.
    pub fn tokens_between(&self, start: Position, end: Position) -> &[String] {
        let len = self.tokens.len() as Position;
        let start = start.clamp(0, len);
        let end = end.saturating_add(1).clamp(start, len);
        &self.tokens[start as usize..end as usize]
    }

    /// Positions of `token`, in ascending order.
    pub fn postings(&self, token: &str) -> &[Position] {
        self.postings.get(token).map_or(&[], Vec::as_slice)
    }

    /// Get current index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            corpus_length: self.tokens.len() as u64,
            vocabulary: self.postings.len() as u64,
            postings: self.postings.values().map(|p| p.len() as u64).sum(),
        }
    }
}

impl InvertedIndex for MemoryIndex {
    fn next(&self, token: &str, position: Position) -> Position {
        let list = self.postings(token);
        let idx = list.partition_point(|&p| p <= position);
        list.get(idx).copied().unwrap_or(POS_INF)
    }

    fn prev(&self, token: &str, position: Position) -> Position {
        let list = self.postings(token);
        let idx = list.partition_point(|&p| p < position);
        if idx == 0 {
            NEG_INF
        } else {
            list[idx - 1]
        }
    }

    fn corpus_length(&self) -> Position {
        self.tokens.len() as Position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_index() -> MemoryIndex {
        MemoryIndex::from_tokens(["the", "cat", "sat", "on", "the", "mat", "."])
    }

    #[test]
    fn test_next_is_strict() {
        let index = make_index();
        assert_eq!(index.next("the", NEG_INF), 0);
        assert_eq!(index.next("the", -1), 0);
        assert_eq!(index.next("the", 0), 4);
        assert_eq!(index.next("the", 4), POS_INF);
        assert_eq!(index.next("the", POS_INF), POS_INF);
    }

    #[test]
    fn test_prev_is_strict() {
        let index = make_index();
        assert_eq!(index.prev("the", POS_INF), 4);
        assert_eq!(index.prev("the", 4), 0);
        assert_eq!(index.prev("the", 0), NEG_INF);
        assert_eq!(index.prev("the", NEG_INF), NEG_INF);
    }

    #[test]
    fn test_unknown_token() {
        let index = make_index();
        assert_eq!(index.next("dog", NEG_INF), POS_INF);
        assert_eq!(index.prev("dog", POS_INF), NEG_INF);
        assert!(index.postings("dog").is_empty());
    }

    #[test]
    fn test_from_text() {
        let tokenizer = Tokenizer::new(Tokenizer::DEFAULT_PATTERN, true).unwrap();
        let index = MemoryIndex::from_text("The cat sat on the mat.", &tokenizer);

        assert_eq!(index.corpus_length(), 7);
        assert_eq!(index.postings("the"), &[0, 4]);
        assert_eq!(index.token_at(6), Some("."));
        assert_eq!(index.token_at(7), None);
        assert_eq!(index.token_at(-1), None);
    }

    #[test]
    fn test_case_sensitive_tokenizer() {
        let tokenizer = Tokenizer::new(r"\S+", false).unwrap();
        let tokens: Vec<_> = tokenizer.tokenize("The cat, The end").collect();
        assert_eq!(tokens, vec!["The", "cat,", "The", "end"]);
    }

    #[test]
    fn test_invalid_token_pattern() {
        let err = Tokenizer::new("(", true).unwrap_err();
        assert!(matches!(err, GclError::ConfigError { .. }));
    }

    #[test]
    fn test_from_postings() {
        let index =
            MemoryIndex::from_postings(7, [("the", &[5, 0][..]), ("cat", &[1, 6][..])]).unwrap();

        assert_eq!(index.corpus_length(), 7);
        assert_eq!(index.postings("the"), &[0, 5]);
        assert_eq!(index.next("cat", 1), 6);
        assert_eq!(index.token_at(3), Some(""));
    }

    #[test]
    fn test_from_postings_rejects_out_of_range() {
        let result = MemoryIndex::from_postings(3, [("x", &[3][..])]);
        assert!(matches!(result, Err(GclError::InvalidArgument { .. })));
    }

    #[test]
    fn test_tokens_between() {
        let index = make_index();
        assert_eq!(index.tokens_between(1, 3), &["cat", "sat", "on"]);
        assert_eq!(index.tokens_between(5, 100), &["mat", "."]);
        assert!(index.tokens_between(9, 12).is_empty());
    }

    #[test]
    fn test_stats() {
        let stats = make_index().stats();
        assert_eq!(stats.corpus_length, 7);
        assert_eq!(stats.vocabulary, 6);
        assert_eq!(stats.postings, 7);
    }
}
