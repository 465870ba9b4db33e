//! Parsed query expressions.

use crate::index::Tokenizer;
use crate::types::Position;
use std::fmt;

/// Binary operators of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `^`
    And,
    /// `+`
    Or,
    /// `..`
    BoundedBy,
    /// `>`
    Containing,
    /// `<`
    ContainedIn,
    /// `!>`
    NotContaining,
    /// `!<`
    NotContainedIn,
}

impl BinaryOp {
    /// The operator as written in query text.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "^",
            BinaryOp::Or => "+",
            BinaryOp::BoundedBy => "..",
            BinaryOp::Containing => ">",
            BinaryOp::ContainedIn => "<",
            BinaryOp::NotContaining => "!>",
            BinaryOp::NotContainedIn => "!<",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A query expression tree.
///
/// `Display` renders the fully parenthesized form, which parses back to
/// the same tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// One or more tokens at consecutive positions
    Phrase(Vec<String>),

    /// A single corpus position
    Position(Position),

    /// Every window of the given width
    Length(usize),

    /// `%N`, bound to the N-th argument at compile time (1-based)
    Parameter(usize),

    /// `_{e}`
    Start(Box<Expr>),

    /// `{e}_`
    End(Box<Expr>),

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Highest parameter number referenced, or 0 when there is none.
    pub fn max_parameter(&self) -> usize {
        match self {
            Expr::Parameter(n) => *n,
            Expr::Start(e) | Expr::End(e) => e.max_parameter(),
            Expr::Binary { left, right, .. } => left.max_parameter().max(right.max_parameter()),
            Expr::Phrase(_) | Expr::Position(_) | Expr::Length(_) => 0,
        }
    }

    /// Normalize every phrase token the way the corpus was tokenized.
    pub fn normalized(self, tokenizer: &Tokenizer) -> Expr {
        match self {
            Expr::Phrase(tokens) => {
                Expr::Phrase(tokens.iter().map(|t| tokenizer.normalize(t)).collect())
            }
            Expr::Start(e) => Expr::Start(Box::new(e.normalized(tokenizer))),
            Expr::End(e) => Expr::End(Box::new(e.normalized(tokenizer))),
            Expr::Binary { op, left, right } => Expr::Binary {
                op,
                left: Box::new(left.normalized(tokenizer)),
                right: Box::new(right.normalized(tokenizer)),
            },
            other => other,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in token.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Phrase(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, token)?;
                }
                Ok(())
            }
            Expr::Position(p) => write!(f, "{}", p),
            Expr::Length(n) => write!(f, "[{}]", n),
            Expr::Parameter(n) => write!(f, "%{}", n),
            Expr::Start(e) => write!(f, "_{{{}}}", e),
            Expr::End(e) => write!(f, "{{{}}}_", e),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
