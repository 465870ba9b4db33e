//! Query tokenizer.

use crate::error::{GclError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Str(String),
    Int(u64),
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Percent,
    /// `_{`
    StartOpen,
    LBrace,
    RBrace,
    /// `_` not followed by `{`
    Underscore,
    Lt,
    Gt,
    NotLt,
    NotGt,
    Plus,
    Caret,
    DotDot,
    Eof,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Str(s) => format!("string {:?}", s),
            Token::Int(n) => format!("integer {}", n),
            Token::Comma => "`,`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Percent => "`%`".into(),
            Token::StartOpen => "`_{`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::Underscore => "`_`".into(),
            Token::Lt => "`<`".into(),
            Token::Gt => "`>`".into(),
            Token::NotLt => "`!<`".into(),
            Token::NotGt => "`!>`".into(),
            Token::Plus => "`+`".into(),
            Token::Caret => "`^`".into(),
            Token::DotDot => "`..`".into(),
            Token::Eof => "end of query".into(),
        }
    }
}

/// A token and the byte offset where it begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Split query text into tokens, ending with `Token::Eof`.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '%' => Token::Percent,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '<' => Token::Lt,
            '>' => Token::Gt,
            '+' => Token::Plus,
            '^' => Token::Caret,
            '_' => {
                if chars.next_if(|&(_, c)| c == '{').is_some() {
                    Token::StartOpen
                } else {
                    Token::Underscore
                }
            }
            '!' => match chars.next_if(|&(_, c)| c == '<' || c == '>') {
                Some((_, '<')) => Token::NotLt,
                Some(_) => Token::NotGt,
                None => return Err(GclError::syntax(offset, "expected `<` or `>` after `!`")),
            },
            '.' => {
                if chars.next_if(|&(_, c)| c == '.').is_none() {
                    return Err(GclError::syntax(offset, "expected `..`"));
                }
                Token::DotDot
            }
            '"' | '\'' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return Err(GclError::syntax(offset, "unterminated string"));
                }
                Token::Str(value)
            }
            '0'..='9' => {
                let mut end = offset + 1;
                while let Some((i, _)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                    end = i + 1;
                }
                let digits = &text[offset..end];
                let value = digits
                    .parse::<u64>()
                    .map_err(|_| GclError::syntax(offset, format!("integer {} is too large", digits)))?;
                Token::Int(value)
            }
            other => {
                return Err(GclError::syntax(
                    offset,
                    format!("unexpected character {:?}", other),
                ))
            }
        };
        tokens.push(Spanned { token, offset });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: text.len(),
    });
    Ok(tokens)
}
