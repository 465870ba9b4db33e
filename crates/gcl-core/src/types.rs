//! Core data types for GCL.
//!
//! This module defines the position and interval values every generator
//! produces. These types are designed to be:
//!
//! - **Copyable values**: Probes return fresh intervals, nothing is shared
//! - **Sentinel-safe**: `+1`/`-1` adjustments never overflow the sentinels
//! - **Serializable**: For JSON output of search results

use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based position in the corpus token stream.
///
/// Valid positions lie in `[0, corpus_length - 1]`. The two extremes of the
/// integer range are reserved as sentinels, see [`POS_INF`] and [`NEG_INF`].
pub type Position = i64;

/// "No interval found going forward."
pub const POS_INF: Position = Position::MAX;

/// "No interval found going backward."
pub const NEG_INF: Position = Position::MIN;

/// Returns true if `p` is one of the two sentinels.
#[inline]
pub fn is_sentinel(p: Position) -> bool {
    p == POS_INF || p == NEG_INF
}

/// `p + 1`, leaving sentinels untouched.
#[inline]
pub fn inc(p: Position) -> Position {
    offset(p, 1)
}

/// `p - 1`, leaving sentinels untouched.
#[inline]
pub fn dec(p: Position) -> Position {
    offset(p, -1)
}

/// `p + delta`, leaving sentinels untouched.
///
/// Finite results saturate one step short of the sentinels, so arithmetic on
/// real positions can never manufacture a sentinel by accident.
#[inline]
pub fn offset(p: Position, delta: i64) -> Position {
    if is_sentinel(p) {
        return p;
    }
    p.saturating_add(delta).clamp(NEG_INF + 1, POS_INF - 1)
}

/// An inclusive `[start, end]` range of corpus positions.
///
/// A matched interval satisfies `start <= end`. The forward "not found"
/// result is [`Interval::POS_INF`], the backward one [`Interval::NEG_INF`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    /// First covered position
    pub start: Position,

    /// Last covered position
    pub end: Position,
}

impl Interval {
    /// Forward sentinel `(+inf, +inf)`
    pub const POS_INF: Interval = Interval {
        start: POS_INF,
        end: POS_INF,
    };

    /// Backward sentinel `(-inf, -inf)`
    pub const NEG_INF: Interval = Interval {
        start: NEG_INF,
        end: NEG_INF,
    };

    /// Create a new interval
    pub const fn new(start: Position, end: Position) -> Self {
        Interval { start, end }
    }

    /// Zero-length interval at `p`
    pub const fn point(p: Position) -> Self {
        Interval { start: p, end: p }
    }

    /// True for the forward sentinel
    pub fn is_pos_inf(&self) -> bool {
        self.start == POS_INF
    }

    /// True for the backward sentinel
    pub fn is_neg_inf(&self) -> bool {
        self.end == NEG_INF
    }

    /// True for either sentinel
    pub fn is_sentinel(&self) -> bool {
        self.is_pos_inf() || self.is_neg_inf()
    }

    /// Number of covered positions (0 for sentinels)
    pub fn len(&self) -> u64 {
        if self.is_sentinel() {
            0
        } else {
            self.end.abs_diff(self.start) + 1
        }
    }

    /// Whether `other` lies within this interval
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

fn fmt_position(p: Position, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match p {
        POS_INF => write!(f, "+inf"),
        NEG_INF => write!(f, "-inf"),
        p => write!(f, "{}", p),
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        fmt_position(self.start, f)?;
        write!(f, ", ")?;
        fmt_position(self.end, f)?;
        write!(f, "]")
    }
}

impl From<(Position, Position)> for Interval {
    fn from((start, end): (Position, Position)) -> Self {
        Interval { start, end }
    }
}
