//! Textual query language.
//!
//! Queries are parsed into an [`Expr`] tree and compiled into generators
//! through the [`Gcl`](crate::Gcl) facade. Parameters `%1`, `%2`, ... are
//! bound at compile time to a slice of [`Argument`]s.
//!
//! # Query Syntax
//!
//! - `"word"` or `'word'` - a single token
//! - `"new", "york"` - a phrase of consecutive tokens
//! - `42` - the single position 42
//! - `[5]` - every window of 5 positions
//! - `%1` - the first argument
//! - `a .. b` - from an `a` to the following `b`
//! - `a ^ b` - smallest spans holding both an `a` and a `b`
//! - `a + b` - either
//! - `a > b` - `a` intervals containing some `b`
//! - `a < b` - `a` intervals contained in some `b`
//! - `_{a}`, `{a}_` - start and end points of each `a`
//!
//! Containment binds loosest, then `+`, `^`, and `..`. `!>` and `!<` parse
//! but fail to compile.

mod ast;
mod compiler;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr};
pub use compiler::{compile, Argument};
pub use parser::{parse, MAX_DEPTH};
