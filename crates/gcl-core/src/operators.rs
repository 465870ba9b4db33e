//! Interval operators.
//!
//! Each operator is a lazy generator over one or two child generators and
//! talks to them only through the four probes. Results never contain nested
//! intervals, so every binary operator implements one forward and one
//! backward probe directly and derives the remaining two with the reductions
//! in [`crate::generator`].
//!
//! | Operator | Query syntax | Matches |
//! |---|---|---|
//! | [`And`] | `a ^ b` | smallest spans covering a match of `a` and a match of `b` |
//! | [`Or`] | `a + b` | matches of either side |
//! | [`BoundedBy`] | `a .. b` | from a match of `a` to a later match of `b` |
//! | [`Containing`] | `a > b` | matches of `a` containing a match of `b` |
//! | [`ContainedIn`] | `a < b` | matches of `a` inside a match of `b` |
//! | [`Start`] | `_{a}` | the first position of each match of `a` |
//! | [`End`] | `{a}_` | the last position of each match of `a` |

use crate::error::Result;
use crate::generator::{
    first_ending_via_starting, first_starting_via_ending, last_ending_via_starting,
    last_starting_via_ending, Generator, IntervalGenerator, LoopGuard,
};
use crate::types::{dec, inc, Interval, Position};

// === And ===

/// Smallest intervals spanning one match from each side.
#[derive(Debug, Clone)]
pub struct And {
    a: Generator,
    b: Generator,
}

impl And {
    pub fn new(a: Generator, b: Generator) -> Self {
        And { a, b }
    }
}

impl IntervalGenerator for And {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let x = self.a.first_starting_at_or_after(k)?;
        let y = self.b.first_starting_at_or_after(k)?;
        if x.is_pos_inf() || y.is_pos_inf() {
            return Ok(Interval::POS_INF);
        }

        // Re-anchor both sides against the later end to get the tightest span.
        let v = x.end.max(y.end);
        let x = self.a.last_ending_at_or_before(v)?;
        let y = self.b.last_ending_at_or_before(v)?;
        Ok(Interval::new(x.start.min(y.start), x.end.max(y.end)))
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        first_ending_via_starting(self, k)
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let x = self.a.last_ending_at_or_before(k)?;
        let y = self.b.last_ending_at_or_before(k)?;
        if x.is_neg_inf() || y.is_neg_inf() {
            return Ok(Interval::NEG_INF);
        }

        let u = x.start.min(y.start);
        let x = self.a.first_starting_at_or_after(u)?;
        let y = self.b.first_starting_at_or_after(u)?;
        Ok(Interval::new(x.start.min(y.start), x.end.max(y.end)))
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        last_starting_via_ending(self, k)
    }
}

// === Or ===

/// Matches of either side, keeping only the innermost where they nest.
#[derive(Debug, Clone)]
pub struct Or {
    a: Generator,
    b: Generator,
}

impl Or {
    pub fn new(a: Generator, b: Generator) -> Self {
        Or { a, b }
    }
}

impl IntervalGenerator for Or {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let x = self.a.first_starting_at_or_after(k)?;
        let y = self.b.first_starting_at_or_after(k)?;
        Ok(if x.end < y.end {
            x
        } else if y.end < x.end {
            y
        } else {
            Interval::new(x.start.max(y.start), x.end)
        })
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        first_ending_via_starting(self, k)
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let x = self.a.last_ending_at_or_before(k)?;
        let y = self.b.last_ending_at_or_before(k)?;
        Ok(if x.start > y.start {
            x
        } else if y.start > x.start {
            y
        } else {
            Interval::new(x.start, x.end.min(y.end))
        })
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        last_starting_via_ending(self, k)
    }
}

// === BoundedBy ===

/// A match of `a` followed by a later, non-overlapping match of `b`,
/// reported as the span from the start of `a` to the end of `b`.
#[derive(Debug, Clone)]
pub struct BoundedBy {
    a: Generator,
    b: Generator,
}

impl BoundedBy {
    pub fn new(a: Generator, b: Generator) -> Self {
        BoundedBy { a, b }
    }
}

impl IntervalGenerator for BoundedBy {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let x = self.a.first_starting_at_or_after(k)?;
        if x.is_pos_inf() {
            return Ok(Interval::POS_INF);
        }
        let y = self.b.first_starting_at_or_after(inc(x.end))?;
        if y.is_pos_inf() {
            return Ok(Interval::POS_INF);
        }
        let x = self.a.last_ending_at_or_before(dec(y.start))?;
        Ok(Interval::new(x.start, y.end))
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        first_ending_via_starting(self, k)
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let y = self.b.last_ending_at_or_before(k)?;
        if y.is_neg_inf() {
            return Ok(Interval::NEG_INF);
        }
        let x = self.a.last_ending_at_or_before(dec(y.start))?;
        if x.is_neg_inf() {
            return Ok(Interval::NEG_INF);
        }
        let y = self.b.first_starting_at_or_after(inc(x.end))?;
        Ok(Interval::new(x.start, y.end))
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        last_starting_via_ending(self, k)
    }
}

// === Containing ===

/// Matches of `a` that contain at least one match of `b`.
#[derive(Debug, Clone)]
pub struct Containing {
    a: Generator,
    b: Generator,
    limit: usize,
}

impl Containing {
    /// Create the operator without an iteration guard.
    pub fn new(a: Generator, b: Generator) -> Self {
        Containing {
            a,
            b,
            limit: usize::MAX,
        }
    }

    /// Fail a probe after `limit` retries instead of looping on.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl IntervalGenerator for Containing {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        first_starting_via_ending(self, k)
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        let mut guard = LoopGuard::new("Containing", self.limit);
        let mut k = k;

        loop {
            guard.tick(k)?;
            let x = self.a.first_ending_at_or_after(k)?;
            if x.is_pos_inf() {
                return Ok(Interval::POS_INF);
            }
            let y = self.b.first_starting_at_or_after(x.start)?;
            if y.is_pos_inf() {
                return Ok(Interval::POS_INF);
            }
            if y.end <= x.end {
                return Ok(x);
            }
            // No match of `a` ending before y.end can hold a match of `b`.
            k = y.end;
        }
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        last_ending_via_starting(self, k)
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        let mut guard = LoopGuard::new("Containing", self.limit);
        let mut k = k;

        loop {
            guard.tick(k)?;
            let x = self.a.last_starting_at_or_before(k)?;
            if x.is_neg_inf() {
                return Ok(Interval::NEG_INF);
            }
            let y = self.b.last_ending_at_or_before(x.end)?;
            if y.is_neg_inf() {
                return Ok(Interval::NEG_INF);
            }
            if y.start >= x.start {
                return Ok(x);
            }
            k = y.start;
        }
    }
}

// === ContainedIn ===

/// Matches of `a` that lie inside at least one match of `b`.
#[derive(Debug, Clone)]
pub struct ContainedIn {
    a: Generator,
    b: Generator,
    limit: usize,
}

impl ContainedIn {
    /// Create the operator without an iteration guard.
    pub fn new(a: Generator, b: Generator) -> Self {
        ContainedIn {
            a,
            b,
            limit: usize::MAX,
        }
    }

    /// Fail a probe after `limit` retries instead of looping on.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl IntervalGenerator for ContainedIn {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        let mut guard = LoopGuard::new("ContainedIn", self.limit);
        let mut k = k;

        loop {
            guard.tick(k)?;
            let x = self.a.first_starting_at_or_after(k)?;
            if x.is_pos_inf() {
                return Ok(Interval::POS_INF);
            }
            let y = self.b.first_ending_at_or_after(x.end)?;
            if y.is_pos_inf() {
                return Ok(Interval::POS_INF);
            }
            if y.start <= x.start {
                return Ok(x);
            }
            // No match of `a` starting before y.start fits inside a match of `b`.
            k = y.start;
        }
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        first_ending_via_starting(self, k)
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        let mut guard = LoopGuard::new("ContainedIn", self.limit);
        let mut k = k;

        loop {
            guard.tick(k)?;
            let x = self.a.last_ending_at_or_before(k)?;
            if x.is_neg_inf() {
                return Ok(Interval::NEG_INF);
            }
            let y = self.b.last_starting_at_or_before(x.start)?;
            if y.is_neg_inf() {
                return Ok(Interval::NEG_INF);
            }
            if y.end >= x.end {
                return Ok(x);
            }
            k = y.end;
        }
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        last_starting_via_ending(self, k)
    }
}

// === Projections ===
//
// A projected match is a single position, so "starting" and "ending" probes
// coincide. Start reads its child's start-ordered probes in both cases and
// End its end-ordered ones.

/// The zero-length interval at the start of each match.
#[derive(Debug, Clone)]
pub struct Start {
    a: Generator,
}

impl Start {
    pub fn new(a: Generator) -> Self {
        Start { a }
    }
}

impl IntervalGenerator for Start {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.first_starting_at_or_after(k)?.start))
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.first_starting_at_or_after(k)?.start))
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.last_starting_at_or_before(k)?.start))
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.last_starting_at_or_before(k)?.start))
    }
}

/// The zero-length interval at the end of each match.
#[derive(Debug, Clone)]
pub struct End {
    a: Generator,
}

impl End {
    pub fn new(a: Generator) -> Self {
        End { a }
    }
}

impl IntervalGenerator for End {
    fn first_starting_at_or_after(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.first_ending_at_or_after(k)?.end))
    }

    fn first_ending_at_or_after(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.first_ending_at_or_after(k)?.end))
    }

    fn last_ending_at_or_before(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.last_ending_at_or_before(k)?.end))
    }

    fn last_starting_at_or_before(&self, k: Position) -> Result<Interval> {
        Ok(Interval::point(self.a.last_ending_at_or_before(k)?.end))
    }
}
