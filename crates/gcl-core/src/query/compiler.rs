//! Expression compiler: `Expr` to a generator tree through the facade.

use super::ast::{BinaryOp, Expr};
use crate::error::{GclError, Result};
use crate::gcl::Gcl;
use crate::generator::Generator;
use crate::types::Position;
use std::fmt;

/// A value bound to a `%N` parameter.
#[derive(Clone)]
pub enum Argument {
    /// A single token
    Term(String),

    /// Tokens at consecutive positions
    Phrase(Vec<String>),

    /// A single corpus position
    Position(Position),

    /// A prebuilt generator tree
    Generator(Generator),
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Term(t) => f.debug_tuple("Term").field(t).finish(),
            Argument::Phrase(p) => f.debug_tuple("Phrase").field(p).finish(),
            Argument::Position(p) => f.debug_tuple("Position").field(p).finish(),
            Argument::Generator(g) => f.debug_tuple("Generator").field(g).finish(),
        }
    }
}

impl From<&str> for Argument {
    fn from(token: &str) -> Self {
        Argument::Term(token.to_string())
    }
}

impl From<Position> for Argument {
    fn from(position: Position) -> Self {
        Argument::Position(position)
    }
}

impl From<Generator> for Argument {
    fn from(generator: Generator) -> Self {
        Argument::Generator(generator)
    }
}

/// Build the generator tree for `expr`, binding `%N` to `args[N - 1]`.
pub fn compile(gcl: &Gcl, expr: &Expr, args: &[Argument]) -> Result<Generator> {
    match expr {
        Expr::Phrase(tokens) => match tokens.as_slice() {
            [token] => Ok(gcl.term(token.as_str())),
            _ => gcl.phrase(tokens.iter().cloned()),
        },
        Expr::Position(p) => gcl.position(*p),
        Expr::Length(n) => gcl.length(*n),
        Expr::Parameter(index) => {
            let arg = index
                .checked_sub(1)
                .and_then(|i| args.get(i))
                .ok_or(GclError::UnboundParameter {
                    index: *index,
                    supplied: args.len(),
                })?;
            bind(gcl, arg)
        }
        Expr::Start(inner) => Ok(gcl.start(compile(gcl, inner, args)?)),
        Expr::End(inner) => Ok(gcl.end(compile(gcl, inner, args)?)),
        Expr::Binary { op, left, right } => {
            let a = compile(gcl, left, args)?;
            let b = compile(gcl, right, args)?;
            match op {
                BinaryOp::And => Ok(gcl.and(a, b)),
                BinaryOp::Or => Ok(gcl.or(a, b)),
                BinaryOp::BoundedBy => Ok(gcl.bounded_by(a, b)),
                BinaryOp::Containing => Ok(gcl.containing(a, b)),
                BinaryOp::ContainedIn => Ok(gcl.contained_in(a, b)),
                BinaryOp::NotContaining => gcl.not_containing(a, b),
                BinaryOp::NotContainedIn => gcl.not_contained_in(a, b),
            }
        }
    }
}

fn bind(gcl: &Gcl, arg: &Argument) -> Result<Generator> {
    match arg {
        Argument::Term(token) => Ok(gcl.term(token.as_str())),
        Argument::Phrase(tokens) => gcl.phrase(tokens.iter().cloned()),
        Argument::Position(p) => gcl.position(*p),
        Argument::Generator(g) => Ok(g.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorExt;
    use crate::index::MemoryIndex;
    use crate::query::parse;
    use crate::types::Interval;
    use std::sync::Arc;

    fn make_gcl() -> Gcl {
        Gcl::new(Arc::new(MemoryIndex::from_tokens([
            "the", "cat", "sat", "on", "the", "mat", ".",
        ])))
    }

    fn run(gcl: &Gcl, text: &str, args: &[Argument]) -> Vec<(Position, Position)> {
        let expr = parse(text).unwrap();
        let generator = compile(gcl, &expr, args).unwrap();
        generator
            .intervals()
            .map(|r| r.unwrap())
            .map(|i| (i.start, i.end))
            .collect()
    }

    #[test]
    fn test_parameters_are_one_based() {
        let gcl = make_gcl();
        let args = [Argument::from("cat"), Argument::Phrase(vec!["the".into(), "mat".into()])];
        assert_eq!(run(&gcl, "%1", &args), vec![(1, 1)]);
        assert_eq!(run(&gcl, "%2", &args), vec![(4, 5)]);
    }

    #[test]
    fn test_unbound_parameter() {
        let gcl = make_gcl();
        let expr = parse("%1 .. %3").unwrap();
        let err = compile(&gcl, &expr, &[Argument::from("a"), Argument::from("b")]).unwrap_err();
        assert!(matches!(
            err,
            GclError::UnboundParameter {
                index: 3,
                supplied: 2
            }
        ));
    }

    #[test]
    fn test_generator_and_position_arguments() {
        let gcl = make_gcl();
        let prebuilt = gcl.or(gcl.term("sat"), gcl.term("."));
        let args = [Argument::from(prebuilt), Argument::from(3 as Position)];
        assert_eq!(run(&gcl, "%1", &args), vec![(2, 2), (6, 6)]);
        assert_eq!(run(&gcl, "%2 + %1", &args), vec![(2, 2), (3, 3), (6, 6)]);
    }

    #[test]
    fn test_not_operators_fail_at_compile_time() {
        let gcl = make_gcl();
        for (text, operator) in [("'a' !> 'b'", "NotContaining"), ("'a' !< 'b'", "NotContainedIn")] {
            let expr = parse(text).unwrap();
            match compile(&gcl, &expr, &[]) {
                Err(GclError::NotImplemented { operator: op }) => assert_eq!(op, operator),
                other => panic!("expected NotImplemented, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_invalid_literals() {
        let gcl = make_gcl();
        let expr = parse("[0]").unwrap();
        assert!(matches!(
            compile(&gcl, &expr, &[]),
            Err(GclError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_compiled_projection() {
        let gcl = make_gcl();
        assert_eq!(run(&gcl, "{'the', 'cat' .. 'mat'}_", &[]), vec![(5, 5)]);
        let first: Vec<Interval> = compile(&gcl, &parse("_{'the'}").unwrap(), &[])
            .unwrap()
            .intervals_rev()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(first, vec![Interval::point(4), Interval::point(0)]);
    }
}
