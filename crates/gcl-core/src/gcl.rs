//! The query construction facade.
//!
//! [`Gcl`] binds a shared index into every node it builds, so callers never
//! handle the index themselves. There is one factory per generator and
//! operator, plus [`Gcl::compile`] for textual queries.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gcl_core::{Gcl, GeneratorExt, Interval, MemoryIndex};
//!
//! let index = MemoryIndex::from_tokens(["the", "cat", "sat", "on", "the", "mat", "."]);
//! let gcl = Gcl::new(Arc::new(index));
//!
//! let query = gcl.bounded_by(gcl.term("cat"), gcl.term("mat"));
//! let found: Vec<Interval> = query.intervals().collect::<Result<_, _>>().unwrap();
//! assert_eq!(found, vec![Interval::new(1, 5)]);
//! ```

use crate::config::QueryConfig;
use crate::error::{GclError, Result};
use crate::generator::Generator;
use crate::index::InvertedIndex;
use crate::operators::{And, BoundedBy, ContainedIn, Containing, End, Or, Start};
use crate::primitives::{FixedLengthGenerator, ListGenerator, PhraseGenerator};
use crate::query::{self, Argument};
use crate::types::{Interval, Position};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Factory for generator trees over one index.
#[derive(Clone)]
pub struct Gcl {
    index: Arc<dyn InvertedIndex>,

    /// Retry cap handed to Containing and ContainedIn nodes
    iteration_limit: usize,
}

impl fmt::Debug for Gcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gcl")
            .field("corpus_length", &self.index.corpus_length())
            .field("iteration_limit", &self.iteration_limit)
            .finish()
    }
}

impl Gcl {
    /// Create a facade with the default iteration guard.
    pub fn new(index: Arc<dyn InvertedIndex>) -> Self {
        Self::with_config(index, &QueryConfig::default())
    }

    /// Create a facade using the query section of the configuration.
    ///
    /// Without an explicit `iteration_limit` the guard is derived from the
    /// corpus. Every node this facade builds matches only inside the corpus
    /// and each retry strictly advances to the end or start of such a match,
    /// so a correct tree stays under `corpus_length + 2` iterations.
    pub fn with_config(index: Arc<dyn InvertedIndex>, config: &QueryConfig) -> Self {
        let iteration_limit = config.iteration_limit.unwrap_or_else(|| {
            usize::try_from(index.corpus_length())
                .unwrap_or(0)
                .saturating_add(2)
        });
        Gcl {
            index,
            iteration_limit,
        }
    }

    /// The index every node reads from.
    pub fn index(&self) -> &Arc<dyn InvertedIndex> {
        &self.index
    }

    /// Number of positions in the corpus.
    pub fn corpus_length(&self) -> Position {
        self.index.corpus_length()
    }

    /// Retry cap applied to containment operators.
    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    // === Primitives ===

    /// Every occurrence of a single token.
    pub fn term(&self, token: impl Into<String>) -> Generator {
        Arc::new(PhraseGenerator::single(self.index.clone(), token))
    }

    /// Every run of `tokens` at consecutive positions.
    pub fn phrase<I, S>(&self, tokens: I) -> Result<Generator>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Arc::new(PhraseGenerator::new(self.index.clone(), tokens)?))
    }

    /// The single position `p`.
    pub fn position(&self, p: Position) -> Result<Generator> {
        self.slice(p, p)
    }

    /// The literal interval `[start, end]`.
    ///
    /// A literal reaching past the last position matches nothing.
    pub fn slice(&self, start: Position, end: Position) -> Result<Generator> {
        let list = ListGenerator::new([Interval::new(start, end)])?;
        let corpus_length = self.index.corpus_length();
        if end >= corpus_length {
            debug!(start, end, corpus_length, "Literal lies outside the corpus");
            return Ok(Arc::new(ListGenerator::empty()));
        }
        Ok(Arc::new(list))
    }

    /// Every window of `length` positions.
    pub fn length(&self, length: usize) -> Result<Generator> {
        Ok(Arc::new(FixedLengthGenerator::new(
            length,
            self.index.corpus_length(),
        )?))
    }

    /// The whole corpus as one interval (nothing for an empty corpus).
    pub fn corpus(&self) -> Generator {
        Arc::new(FixedLengthGenerator::whole_corpus(
            self.index.corpus_length(),
        ))
    }

    // === Binary Operators ===

    /// `a ^ b`
    pub fn and(&self, a: Generator, b: Generator) -> Generator {
        Arc::new(And::new(a, b))
    }

    /// `a + b`
    pub fn or(&self, a: Generator, b: Generator) -> Generator {
        Arc::new(Or::new(a, b))
    }

    /// `a .. b`
    pub fn bounded_by(&self, a: Generator, b: Generator) -> Generator {
        Arc::new(BoundedBy::new(a, b))
    }

    /// `a > b`
    pub fn containing(&self, a: Generator, b: Generator) -> Generator {
        Arc::new(Containing::new(a, b).with_iteration_limit(self.iteration_limit))
    }

    /// `a < b`
    pub fn contained_in(&self, a: Generator, b: Generator) -> Generator {
        Arc::new(ContainedIn::new(a, b).with_iteration_limit(self.iteration_limit))
    }

    /// `a !> b`: not available, always fails.
    pub fn not_containing(&self, _a: Generator, _b: Generator) -> Result<Generator> {
        Err(GclError::NotImplemented {
            operator: "NotContaining",
        })
    }

    /// `a !< b`: not available, always fails.
    pub fn not_contained_in(&self, _a: Generator, _b: Generator) -> Result<Generator> {
        Err(GclError::NotImplemented {
            operator: "NotContainedIn",
        })
    }

    // === Unary Operators ===

    /// `_{a}`
    pub fn start(&self, a: Generator) -> Generator {
        Arc::new(Start::new(a))
    }

    /// `{a}_`
    pub fn end(&self, a: Generator) -> Generator {
        Arc::new(End::new(a))
    }

    // === Text Queries ===

    /// Parse `text` and compile it against `args` (`%1` is `args[0]`).
    pub fn compile(&self, text: &str, args: &[Argument]) -> Result<Generator> {
        let expr = query::parse(text)?;
        debug!(query = text, expr = %expr, args = args.len(), "Compiling query");
        query::compile(self, &expr, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorExt;
    use crate::index::MemoryIndex;
    use crate::types::POS_INF;

    fn make_gcl() -> Gcl {
        Gcl::new(Arc::new(MemoryIndex::from_tokens([
            "the", "cat", "sat", "on", "the", "mat", ".",
        ])))
    }

    fn pairs(g: &Generator) -> Vec<(Position, Position)> {
        g.intervals()
            .map(|r| r.unwrap())
            .map(|i| (i.start, i.end))
            .collect()
    }

    #[test]
    fn test_sentence_scenario() {
        let gcl = make_gcl();

        let cat_to_mat = gcl.bounded_by(gcl.term("cat"), gcl.term("mat"));
        assert_eq!(pairs(&cat_to_mat), vec![(1, 5)]);

        let sentence = gcl.bounded_by(gcl.position(0).unwrap(), gcl.term("."));
        let found = gcl.containing(sentence, gcl.term("sat"));
        assert_eq!(pairs(&found), vec![(0, 6)]);

        let the_in_span = gcl.contained_in(gcl.term("the"), cat_to_mat.clone());
        assert_eq!(pairs(&the_in_span), vec![(4, 4)]);

        assert_eq!(pairs(&gcl.end(cat_to_mat)), vec![(5, 5)]);
    }

    #[test]
    fn test_and_is_minimal() {
        let gcl = make_gcl();
        let both = gcl.and(gcl.term("the"), gcl.term("sat"));
        assert_eq!(pairs(&both), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_phrase_and_primitives() {
        let gcl = make_gcl();
        assert_eq!(pairs(&gcl.phrase(["the", "mat"]).unwrap()), vec![(4, 5)]);
        assert_eq!(pairs(&gcl.slice(2, 3).unwrap()), vec![(2, 3)]);
        assert_eq!(pairs(&gcl.corpus()), vec![(0, 6)]);
        assert_eq!(pairs(&gcl.length(6).unwrap()), vec![(0, 5), (1, 6)]);
        assert!(pairs(&gcl.term("dog")).is_empty());
    }

    #[test]
    fn test_invalid_factories() {
        let gcl = make_gcl();
        assert!(matches!(
            gcl.phrase(Vec::<String>::new()),
            Err(GclError::InvalidArgument { .. })
        ));
        assert!(matches!(gcl.position(-1), Err(GclError::InvalidArgument { .. })));
        assert!(matches!(gcl.slice(4, 2), Err(GclError::InvalidArgument { .. })));
        assert!(matches!(gcl.length(0), Err(GclError::InvalidArgument { .. })));
    }

    #[test]
    fn test_literals_past_corpus_end_match_nothing() {
        let gcl = make_gcl();
        assert!(pairs(&gcl.position(7).unwrap()).is_empty());
        assert!(pairs(&gcl.position(100).unwrap()).is_empty());
        assert!(pairs(&gcl.slice(5, 9).unwrap()).is_empty());
        assert_eq!(pairs(&gcl.slice(5, 6).unwrap()), vec![(5, 6)]);
        assert!(matches!(gcl.slice(9, 5), Err(GclError::InvalidArgument { .. })));
    }

    #[test]
    fn test_containment_of_outside_literals_is_empty() {
        let gcl = Gcl::new(Arc::new(MemoryIndex::from_tokens(["x"])));
        assert_eq!(gcl.iteration_limit(), 3);

        let query = gcl
            .compile("(10 + 20 + 30 + 40) > (11 + 21 + 31 + 41)", &[])
            .unwrap();
        assert!(pairs(&query).is_empty());
        assert_eq!(pairs(&gcl.compile("0 + 100", &[]).unwrap()), vec![(0, 0)]);

        let built = gcl.containing(
            gcl.or(gcl.position(10).unwrap(), gcl.position(20).unwrap()),
            gcl.or(gcl.position(11).unwrap(), gcl.position(21).unwrap()),
        );
        assert!(pairs(&built).is_empty());
    }

    #[test]
    fn test_not_operators_are_unavailable() {
        let gcl = make_gcl();
        let err = gcl
            .not_containing(gcl.term("the"), gcl.term("cat"))
            .unwrap_err();
        assert!(matches!(err, GclError::NotImplemented { operator: "NotContaining" }));
        assert!(err.is_query_error());

        let err = gcl
            .not_contained_in(gcl.term("the"), gcl.term("cat"))
            .unwrap_err();
        assert!(matches!(err, GclError::NotImplemented { operator: "NotContainedIn" }));
    }

    #[test]
    fn test_compile_matches_factories() {
        let gcl = make_gcl();
        let built = gcl.containing(
            gcl.bounded_by(gcl.term("the"), gcl.term(".")),
            gcl.phrase(["the", "mat"]).unwrap(),
        );
        let compiled = gcl.compile("'the' .. '.' > 'the', 'mat'", &[]).unwrap();
        assert_eq!(pairs(&compiled), pairs(&built));
        assert_eq!(pairs(&compiled), vec![(4, 6)]);
    }

    #[test]
    fn test_iteration_limit_from_corpus() {
        let gcl = make_gcl();
        assert_eq!(gcl.iteration_limit(), 9);
        assert_eq!(gcl.corpus_length(), 7);

        let config = QueryConfig {
            iteration_limit: Some(1),
            ..Default::default()
        };
        let strict = Gcl::with_config(gcl.index().clone(), &config);
        assert_eq!(strict.iteration_limit(), 1);

        // The first "the" holds no "cat", so a second iteration is needed.
        let query = strict.containing(gcl.term("the"), gcl.term("cat"));
        let err = query.first_ending_at_or_after(0).unwrap_err();
        assert!(matches!(
            err,
            GclError::IterationLimitExceeded {
                operator: "Containing",
                limit: 1
            }
        ));
    }

    #[test]
    fn test_empty_corpus() {
        let gcl = Gcl::new(Arc::new(MemoryIndex::default()));
        assert!(pairs(&gcl.corpus()).is_empty());
        assert!(pairs(&gcl.length(1).unwrap()).is_empty());
        assert_eq!(
            gcl.term("x").first_starting_at_or_after(0).unwrap().start,
            POS_INF
        );
    }
}
