//! Primitive generators: the leaves of every query tree.
//!
//! - [`PhraseGenerator`]: runs of consecutive tokens, read from the index
//! - [`ListGenerator`]: an explicit, immutable interval list
//! - [`FixedLengthGenerator`]: every window of a given width

use crate::error::{GclError, Result};
use crate::generator::IntervalGenerator;
use crate::index::InvertedIndex;
use crate::types::{dec, inc, offset, Interval, Position, NEG_INF, POS_INF};
use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

// === Phrase ===

/// Matches a fixed sequence of tokens at consecutive positions.
///
/// A phrase of one token is a plain postings traversal.
pub struct PhraseGenerator {
    index: Arc<dyn InvertedIndex>,
    tokens: Vec<String>,
}

impl PhraseGenerator {
    /// Create a phrase generator. The token list must not be empty.
    pub fn new<I, S>(index: Arc<dyn InvertedIndex>, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(GclError::invalid_argument("phrase needs at least one token"));
        }
        Ok(PhraseGenerator { index, tokens })
    }

    /// A phrase of exactly one token.
    pub fn single(index: Arc<dyn InvertedIndex>, token: impl Into<String>) -> Self {
        PhraseGenerator {
            index,
            tokens: vec![token.into()],
        }
    }

    /// The phrase tokens, in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn span(&self) -> i64 {
        self.tokens.len() as i64 - 1
    }
}

impl fmt::Debug for PhraseGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Phrase").field(&self.tokens).finish()
    }
}

impl IntervalGenerator for PhraseGenerator {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let Some((_, init)) = self.tokens.split_last() else {
            return Ok(Interval::POS_INF);
        };
        let mut k = k;

        loop {
            if k == POS_INF {
                return Ok(Interval::POS_INF);
            }

            // Earliest chain t0 < t1 < ... ending on the last token.
            let mut p = dec(k);
            for token in &self.tokens {
                p = self.index.next(token, p);
                if p == POS_INF {
                    return Ok(Interval::POS_INF);
                }
            }
            let v = p;

            // Tightest start for a chain ending at v.
            for token in init.iter().rev() {
                p = self.index.prev(token, p);
            }
            let u = p;

            if v - u == self.span() {
                return Ok(Interval::new(u, v));
            }
            k = inc(u);
        }
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        self.first_starting_at_or_after(offset(k, -self.span()))
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let Some((_, tail)) = self.tokens.split_first() else {
            return Ok(Interval::NEG_INF);
        };
        let mut k = k;

        loop {
            if k == NEG_INF {
                return Ok(Interval::NEG_INF);
            }

            let mut p = inc(k);
            for token in self.tokens.iter().rev() {
                p = self.index.prev(token, p);
                if p == NEG_INF {
                    return Ok(Interval::NEG_INF);
                }
            }
            let u = p;

            for token in tail {
                p = self.index.next(token, p);
            }
            let v = p;

            if v - u == self.span() {
                return Ok(Interval::new(u, v));
            }
            k = dec(v);
        }
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        self.last_ending_at_or_before(offset(k, self.span()))
    }
}

// === List ===

/// An explicit interval list, used for literal positions and slices.
///
/// The list is normalized once at construction and never changes; every
/// probe is a binary search.
#[derive(Debug, Clone)]
pub struct ListGenerator {
    /// No entry contains another, so starts and ends both ascend
    entries: Vec<Interval>,
}

impl ListGenerator {
    /// Create a list generator.
    ///
    /// Every interval must satisfy `0 <= start <= end` and may not use a
    /// sentinel. Duplicates are removed, and an interval that contains
    /// another one of the list is dropped in favour of the inner one.
    pub fn new<I>(intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Interval>,
    {
        let mut entries: Vec<Interval> = intervals.into_iter().collect();

        if let Some(bad) = entries
            .iter()
            .find(|i| i.start < 0 || i.start > i.end || i.end == POS_INF)
        {
            return Err(GclError::invalid_argument(format!(
                "list interval {} is not a valid corpus range",
                bad
            )));
        }

        // Equal starts put the longer interval first, so a backward sweep
        // sees every interval it could contain before reaching it.
        entries.sort_unstable_by_key(|i| (i.start, Reverse(i.end)));
        entries.dedup();

        let mut min_end = POS_INF;
        let mut innermost: Vec<Interval> = entries
            .into_iter()
            .rev()
            .filter(|i| {
                let keep = i.end < min_end;
                min_end = min_end.min(i.end);
                keep
            })
            .collect();
        innermost.reverse();

        Ok(ListGenerator { entries: innermost })
    }

    /// An empty list.
    pub fn empty() -> Self {
        ListGenerator {
            entries: Vec::new(),
        }
    }

    /// The intervals in ascending order.
    pub fn entries(&self) -> &[Interval] {
        &self.entries
    }
}

impl IntervalGenerator for ListGenerator {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let idx = self.entries.partition_point(|i| i.start < k);
        Ok(self.entries.get(idx).copied().unwrap_or(Interval::POS_INF))
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        let idx = self.entries.partition_point(|i| i.end < k);
        Ok(self.entries.get(idx).copied().unwrap_or(Interval::POS_INF))
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let idx = self.entries.partition_point(|i| i.end <= k);
        Ok(match idx {
            0 => Interval::NEG_INF,
            _ => self.entries[idx - 1],
        })
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        let idx = self.entries.partition_point(|i| i.start <= k);
        Ok(match idx {
            0 => Interval::NEG_INF,
            _ => self.entries[idx - 1],
        })
    }
}

// === Fixed Length ===

/// Every interval of exactly `length` positions inside the corpus.
///
/// With `length == corpus_length` this is the single whole-corpus interval.
#[derive(Debug, Clone)]
pub struct FixedLengthGenerator {
    length: Position,
    corpus_length: Position,
}

impl FixedLengthGenerator {
    /// Create a fixed-length generator. `length` must be at least 1.
    pub fn new(length: usize, corpus_length: Position) -> Result<Self> {
        if length == 0 {
            return Err(GclError::invalid_argument("window length must be at least 1"));
        }
        let length = Position::try_from(length)
            .map_err(|_| GclError::invalid_argument("window length out of range"))?;
        Ok(FixedLengthGenerator {
            length,
            corpus_length: corpus_length.max(0),
        })
    }

    /// The single window covering the whole corpus; empty for an empty corpus.
    pub fn whole_corpus(corpus_length: Position) -> Self {
        let corpus_length = corpus_length.max(0);
        FixedLengthGenerator {
            length: corpus_length.max(1),
            corpus_length,
        }
    }

    /// Window width in positions.
    pub fn length(&self) -> Position {
        self.length
    }

    fn window_from(&self, start: Position) -> Interval {
        Interval::new(start, start.saturating_add(self.length - 1))
    }

    fn window_to(&self, end: Position) -> Interval {
        Interval::new(end.saturating_sub(self.length - 1), end)
    }
}

impl IntervalGenerator for FixedLengthGenerator {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        if k == POS_INF {
            return Ok(Interval::POS_INF);
        }
        let window = self.window_from(k.max(0));
        Ok(if window.end >= self.corpus_length {
            Interval::POS_INF
        } else {
            window
        })
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        if k == POS_INF {
            return Ok(Interval::POS_INF);
        }
        // Slide right when the window would start before position 0.
        let window = self.window_to(k.max(self.length - 1));
        Ok(if window.end >= self.corpus_length {
            Interval::POS_INF
        } else {
            window
        })
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        if k == NEG_INF {
            return Ok(Interval::NEG_INF);
        }
        // Slide left when the window would end past the corpus.
        let window = self.window_to(k.min(self.corpus_length - 1));
        Ok(if window.start < 0 {
            Interval::NEG_INF
        } else {
            window
        })
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        if k == NEG_INF {
            return Ok(Interval::NEG_INF);
        }
        let start = k.min(self.corpus_length - self.length);
        Ok(if start < 0 {
            Interval::NEG_INF
        } else {
            self.window_from(start)
        })
    }
}
