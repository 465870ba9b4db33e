//! The interval generator contract.
//!
//! Every primitive and every operator is an [`IntervalGenerator`]: a stateless
//! object answering four directional probes. Operators are written purely in
//! terms of their children's probes, which is what lets arbitrary trees of
//! primitives and operators compose.
//!
//! | Probe | Answer |
//! |---|---|
//! | `first_starting_at_or_after(k)` | first interval with `start >= k`, else `(+inf, +inf)` |
//! | `first_ending_at_or_after(k)` | first interval with `end >= k`, else `(+inf, +inf)` |
//! | `last_ending_at_or_before(k)` | last interval with `end <= k`, else `(-inf, -inf)` |
//! | `last_starting_at_or_before(k)` | last interval with `start <= k`, else `(-inf, -inf)` |
//!
//! On top of the probes, [`GeneratorExt`] provides lazy forward and backward
//! iteration. Iterators own their cursor; the generator is never mutated, so
//! the same tree can be scanned any number of times, from several threads.

use crate::error::{GclError, Result};
use crate::types::{dec, inc, Interval, Position, POS_INF};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A stateless source of intervals answering the four directional probes.
///
/// Probes accept any position, including both sentinels. They fail only when
/// an iteration guard trips; "no match" is reported with a sentinel interval.
pub trait IntervalGenerator: Send + Sync + fmt::Debug {
    /// Smallest interval whose start is `>= k`, ties broken by smaller end.
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval>;

    /// Smallest interval whose end is `>= k`.
    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval>;

    /// Largest interval whose end is `<= k`, ties broken by larger start.
    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval>;

    /// Largest interval whose start is `<= k`.
    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval>;
}

/// A shared, type-erased generator node.
pub type Generator = Arc<dyn IntervalGenerator>;

// === Probe Reductions ===
//
// For a generator whose intervals never nest, ordering by start and ordering
// by end agree, so each probe can be answered from its dual in the opposite
// direction plus one step. Operators implement one forward and one backward
// probe and obtain the other two from these.

/// `first_ending_at_or_after` from the "last ending" and "first starting" probes.
pub fn first_ending_via_starting<G>(g: &G, k: Position) -> Result<Interval>
where
    G: IntervalGenerator + ?Sized,
{
    let prior = g.last_ending_at_or_before(dec(k))?;
    g.first_starting_at_or_after(inc(prior.start))
}

/// `first_starting_at_or_after` from the "last starting" and "first ending" probes.
pub fn first_starting_via_ending<G>(g: &G, k: Position) -> Result<Interval>
where
    G: IntervalGenerator + ?Sized,
{
    let prior = g.last_starting_at_or_before(dec(k))?;
    g.first_ending_at_or_after(inc(prior.end))
}

/// `last_starting_at_or_before` from the "first starting" and "last ending" probes.
pub fn last_starting_via_ending<G>(g: &G, k: Position) -> Result<Interval>
where
    G: IntervalGenerator + ?Sized,
{
    let following = g.first_starting_at_or_after(inc(k))?;
    g.last_ending_at_or_before(dec(following.end))
}

/// `last_ending_at_or_before` from the "first ending" and "last starting" probes.
pub fn last_ending_via_starting<G>(g: &G, k: Position) -> Result<Interval>
where
    G: IntervalGenerator + ?Sized,
{
    let following = g.first_ending_at_or_after(inc(k))?;
    g.last_starting_at_or_before(dec(following.start))
}

// === Iteration Guard ===

/// Counts retry-loop iterations inside one probe call.
///
/// Every retry loop strictly advances its cursor through the corpus, so a
/// limit of `corpus_length + 2` can only be reached through a broken child.
#[derive(Debug)]
pub(crate) struct LoopGuard {
    operator: &'static str,
    limit: usize,
    iterations: usize,
}

impl LoopGuard {
    pub(crate) fn new(operator: &'static str, limit: usize) -> Self {
        LoopGuard {
            operator,
            limit,
            iterations: 0,
        }
    }

    /// Record one iteration at cursor `k`.
    pub(crate) fn tick(&mut self, k: Position) -> Result<()> {
        self.iterations += 1;
        if self.iterations > self.limit {
            return Err(GclError::IterationLimitExceeded {
                operator: self.operator,
                limit: self.limit,
            });
        }
        trace!(
            operator = self.operator,
            iteration = self.iterations,
            cursor = k,
            "retry loop"
        );
        Ok(())
    }
}

// === Iteration ===

/// A lazy scan over a generator's intervals in one direction.
///
/// Forward scans call `first_starting_at_or_after` and move the cursor past
/// each result's start; backward scans call `last_ending_at_or_before` and
/// move the cursor before each result's end. The scan ends at the first
/// sentinel, and after an error it yields nothing more.
pub struct Intervals<'a, G: ?Sized> {
    generator: &'a G,
    cursor: Position,
    reverse: bool,
    done: bool,
}

impl<'a, G: IntervalGenerator + ?Sized> Intervals<'a, G> {
    /// Scan starting at `from`, or at the corpus boundary for the direction
    /// when `from` is `None` (position 0 forward, the last position backward).
    pub fn new(generator: &'a G, from: Option<Position>, reverse: bool) -> Self {
        let cursor = match (from, reverse) {
            (Some(k), _) => k,
            (None, false) => 0,
            (None, true) => POS_INF,
        };
        Intervals {
            generator,
            cursor,
            reverse,
            done: false,
        }
    }

    /// Whether this scan runs backward.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
}

impl<G: IntervalGenerator + ?Sized> Iterator for Intervals<'_, G> {
    type Item = Result<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let probe = if self.reverse {
            self.generator.last_ending_at_or_before(self.cursor)
        } else {
            self.generator.first_starting_at_or_after(self.cursor)
        };

        match probe {
            Ok(interval) if interval.is_sentinel() => {
                self.done = true;
                None
            }
            Ok(interval) => {
                if self.reverse {
                    self.cursor = dec(interval.end);
                } else {
                    self.cursor = inc(interval.start);
                }
                Some(Ok(interval))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<G: IntervalGenerator + ?Sized> std::iter::FusedIterator for Intervals<'_, G> {}

/// Iteration helpers available on every generator, sized or not.
pub trait GeneratorExt: IntervalGenerator {
    /// All intervals in forward order.
    fn intervals(&self) -> Intervals<'_, Self> {
        Intervals::new(self, None, false)
    }

    /// Intervals starting at or after `k`, in forward order.
    fn intervals_from(&self, k: Position) -> Intervals<'_, Self> {
        Intervals::new(self, Some(k), false)
    }

    /// All intervals in backward order.
    fn intervals_rev(&self) -> Intervals<'_, Self> {
        Intervals::new(self, None, true)
    }

    /// Intervals ending at or before `k`, in backward order.
    fn intervals_rev_from(&self, k: Position) -> Intervals<'_, Self> {
        Intervals::new(self, Some(k), true)
    }
}

impl<G: IntervalGenerator + ?Sized> GeneratorExt for G {}
