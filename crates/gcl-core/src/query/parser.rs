//! Recursive-descent parser for query text.
//!
//! Precedence, loosest first: containment (`<`, `>`, `!<`, `!>`), `+`, `^`,
//! `..`, then the projections and primaries. Every binary level is
//! left-associative.
//!
//! Queries may nest at most [`MAX_DEPTH`] levels, counting both operators
//! and brackets, so that compiling and evaluating the tree stays shallow.

use super::ast::{BinaryOp, Expr};
use super::lexer::{tokenize, Spanned, Token};
use crate::error::{GclError, Result};
use crate::types::Position;

/// Deepest operator tree or bracket nesting a query may have.
pub const MAX_DEPTH: usize = 256;

/// Parse query text into an expression tree.
pub fn parse(text: &str) -> Result<Expr> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        nesting: 0,
    };
    let (expr, _) = parser.containment()?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(GclError::syntax(
            parser.offset(),
            format!("unexpected {} after expression", other.describe()),
        )),
    }
}

/// Parse results carry the depth of the tree built so far.
type Parsed = Result<(Expr, usize)>;

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,

    /// Open brackets around the current token
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof and `pos` never moves past it.
        &self.tokens[self.pos].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(GclError::syntax(
                self.offset(),
                format!(
                    "expected {}, found {}",
                    expected.describe(),
                    self.peek().describe()
                ),
            ))
        }
    }

    fn too_deep(offset: usize) -> GclError {
        GclError::syntax(offset, format!("query nests deeper than {} levels", MAX_DEPTH))
    }

    /// Depth of a node whose deepest child has `depth`.
    fn deeper(&self, depth: usize, offset: usize) -> Result<usize> {
        if depth >= MAX_DEPTH {
            return Err(Self::too_deep(offset));
        }
        Ok(depth + 1)
    }

    /// A bracketed sub-expression.
    fn group(&mut self, offset: usize) -> Parsed {
        if self.nesting >= MAX_DEPTH {
            return Err(Self::too_deep(offset));
        }
        self.nesting += 1;
        let inner = self.containment();
        self.nesting -= 1;
        inner
    }

    fn containment(&mut self) -> Parsed {
        let (mut left, mut depth) = self.or()?;
        loop {
            let op = match self.peek() {
                Token::Lt => BinaryOp::ContainedIn,
                Token::Gt => BinaryOp::Containing,
                Token::NotLt => BinaryOp::NotContainedIn,
                Token::NotGt => BinaryOp::NotContaining,
                _ => return Ok((left, depth)),
            };
            let offset = self.offset();
            self.advance();
            let (right, right_depth) = self.or()?;
            depth = self.deeper(depth.max(right_depth), offset)?;
            left = Expr::binary(op, left, right);
        }
    }

    fn or(&mut self) -> Parsed {
        let (mut left, mut depth) = self.and()?;
        while *self.peek() == Token::Plus {
            let offset = self.offset();
            self.advance();
            let (right, right_depth) = self.and()?;
            depth = self.deeper(depth.max(right_depth), offset)?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        Ok((left, depth))
    }

    fn and(&mut self) -> Parsed {
        let (mut left, mut depth) = self.bounded()?;
        while *self.peek() == Token::Caret {
            let offset = self.offset();
            self.advance();
            let (right, right_depth) = self.bounded()?;
            depth = self.deeper(depth.max(right_depth), offset)?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        Ok((left, depth))
    }

    fn bounded(&mut self) -> Parsed {
        let (mut left, mut depth) = self.unary()?;
        while *self.peek() == Token::DotDot {
            let offset = self.offset();
            self.advance();
            let (right, right_depth) = self.unary()?;
            depth = self.deeper(depth.max(right_depth), offset)?;
            left = Expr::binary(BinaryOp::BoundedBy, left, right);
        }
        Ok((left, depth))
    }

    fn unary(&mut self) -> Parsed {
        let offset = self.offset();
        match self.peek() {
            Token::StartOpen => {
                self.advance();
                let (inner, depth) = self.group(offset)?;
                self.expect(Token::RBrace)?;
                let depth = self.deeper(depth, offset)?;
                Ok((Expr::Start(Box::new(inner)), depth))
            }
            Token::LBrace => {
                self.advance();
                let (inner, depth) = self.group(offset)?;
                self.expect(Token::RBrace)?;
                self.expect(Token::Underscore)?;
                let depth = self.deeper(depth, offset)?;
                Ok((Expr::End(Box::new(inner)), depth))
            }
            Token::LParen => {
                self.advance();
                let parsed = self.group(offset)?;
                self.expect(Token::RParen)?;
                Ok(parsed)
            }
            _ => Ok((self.primary()?, 0)),
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let offset = self.offset();
        match self.advance() {
            Token::Str(first) => {
                let mut tokens = vec![first];
                while *self.peek() == Token::Comma {
                    self.advance();
                    let offset = self.offset();
                    match self.advance() {
                        Token::Str(next) => tokens.push(next),
                        other => {
                            return Err(GclError::syntax(
                                offset,
                                format!("expected string after `,`, found {}", other.describe()),
                            ))
                        }
                    }
                }
                Ok(Expr::Phrase(tokens))
            }
            Token::Int(n) => {
                let position = Position::try_from(n)
                    .map_err(|_| GclError::syntax(offset, format!("position {} is too large", n)))?;
                Ok(Expr::Position(position))
            }
            Token::LBracket => {
                let offset = self.offset();
                let length = match self.advance() {
                    Token::Int(n) => usize::try_from(n).map_err(|_| {
                        GclError::syntax(offset, format!("length {} is too large", n))
                    })?,
                    other => {
                        return Err(GclError::syntax(
                            offset,
                            format!("expected length after `[`, found {}", other.describe()),
                        ))
                    }
                };
                self.expect(Token::RBracket)?;
                Ok(Expr::Length(length))
            }
            Token::Percent => {
                let offset = self.offset();
                match self.advance() {
                    Token::Int(n) if n >= 1 => usize::try_from(n)
                        .map(Expr::Parameter)
                        .map_err(|_| GclError::syntax(offset, format!("parameter %{} is too large", n))),
                    Token::Int(_) => Err(GclError::syntax(offset, "parameters are numbered from 1")),
                    other => Err(GclError::syntax(
                        offset,
                        format!("expected parameter number after `%`, found {}", other.describe()),
                    )),
                }
            }
            other => Err(GclError::syntax(
                offset,
                format!("expected an operand, found {}", other.describe()),
            )),
        }
    }
}
