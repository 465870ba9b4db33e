//! # GCL Core Library
//!
//! This crate provides Generalized Concordance Lists: a query engine that
//! finds positional intervals in a token corpus. Structural queries such as
//! "paragraphs containing both X and Y" are built from a handful of
//! primitives and operators, and evaluated lazily over an inverted index.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Positions, sentinels and intervals
//! - **Index** (`index`): The inverted index port and an in-memory index
//! - **Generators** (`generator`): The four-probe contract and iteration
//! - **Primitives** (`primitives`): Phrases, literal lists, fixed-length windows
//! - **Operators** (`operators`): And, Or, BoundedBy, containment, projections
//! - **Facade** (`gcl`): Builds generator trees bound to one index
//! - **Query** (`query`): Query text parser and compiler
//! - **Search** (`search`): Request execution, single and batched
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gcl_core::{Argument, Gcl, GeneratorExt, Interval, MemoryIndex};
//!
//! let index = MemoryIndex::from_tokens(["the", "cat", "sat", "on", "the", "mat", "."]);
//! let gcl = Gcl::new(Arc::new(index));
//!
//! let query = gcl.compile("%1 .. 'mat'", &[Argument::from("cat")]).unwrap();
//! for interval in query.intervals() {
//!     assert_eq!(interval.unwrap(), Interval::new(1, 5));
//! }
//! ```

pub mod config;
pub mod error;
pub mod gcl;
pub mod generator;
pub mod index;
pub mod operators;
pub mod primitives;
pub mod query;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{Config, QueryConfig};
pub use error::{GclError, Result};
pub use gcl::Gcl;
pub use generator::{Generator, GeneratorExt, IntervalGenerator, Intervals};
pub use index::{IndexStats, InvertedIndex, MemoryIndex, Tokenizer};
pub use query::{Argument, Expr};
pub use search::{SearchRequest, SearchResults, Searcher};
pub use types::{Interval, Position, NEG_INF, POS_INF};
