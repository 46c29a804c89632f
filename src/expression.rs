//! Constant folding for the `+ - * /` arithmetic found in defines, array sizes
//! and layout attributes.
//!
//! Macro names are replaced by their values before evaluation, so `MAX_LIGHTS*2`
//! works as long as `MAX_LIGHTS` was defined earlier. Parentheses are not supported.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::{DefineValue, Defines};

const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Identifier which is not a numeric define
    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),

    #[error("unexpected token {token:?} at position {position}")]
    UnexpectedToken { position: usize, token: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, ExpressionError> {
        Ok(match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => {
                if rhs == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                lhs / rhs
            }
        })
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Token {
    Number(f64),
    Op(Operator),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Op(Operator::Add) => f.write_str("+"),
            Token::Op(Operator::Sub) => f.write_str("-"),
            Token::Op(Operator::Mul) => f.write_str("*"),
            Token::Op(Operator::Div) => f.write_str("/"),
        }
    }
}

/// True if `s` contains any of the arithmetic operators.
pub fn contains_operator(s: &str) -> bool {
    s.contains(&OPERATORS[..])
}

/// Space out the operators, then replace every token naming a define with its value.
/// Tokens which are not defines are left alone.
pub fn substitute_defines(expression: &str, defines: &Defines) -> String {
    let mut spaced = String::with_capacity(expression.len() * 2);
    for c in expression.chars() {
        if OPERATORS.contains(&c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    spaced
        .split_whitespace()
        .map(|token| {
            defines
                .get(token)
                .and_then(DefineValue::substitution)
                .unwrap_or_else(|| token.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evaluate `expression` with the usual precedence: `*` and `/` before `+` and `-`,
/// left to right otherwise.
pub fn evaluate(expression: &str, defines: &Defines) -> Result<f64, ExpressionError> {
    let substituted = substitute_defines(expression, defines);
    let tokens = tokenize(&substituted)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.expression(0)?;

    match parser.peek() {
        Some(token) => Err(ExpressionError::UnexpectedToken {
            position: parser.pos,
            token: token.to_string(),
        }),
        None => Ok(value),
    }
}

fn read_while(it: &mut Peekable<Chars>, first: char, pred: impl Fn(char) -> bool) -> String {
    let mut s = String::new();
    s.push(first);
    while let Some(&c) = it.peek() {
        if !pred(c) {
            break;
        }
        s.push(c);
        let _ = it.next();
    }
    s
}

fn tokenize(s: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut it = s.chars().peekable();

    while let Some(c) = it.next() {
        if c.is_whitespace() {
            continue;
        } else if let Some(op) = Operator::from_char(c) {
            tokens.push(Token::Op(op));
        } else if c.is_ascii_digit() || c == '.' {
            let literal = read_while(&mut it, c, |c| c.is_ascii_digit() || c == '.');
            let number = literal
                .parse::<f64>()
                .map_err(|_| ExpressionError::InvalidNumber(literal.clone()))?;
            tokens.push(Token::Number(number));
        } else if c.is_alphabetic() || c == '_' {
            let ident = read_while(&mut it, c, |c| c.is_alphanumeric() || c == '_');
            return Err(ExpressionError::UnknownIdentifier(ident));
        } else {
            return Err(ExpressionError::InvalidCharacter(c));
        }
    }

    Ok(tokens)
}

// Precedence climbing over a flat token list
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self, min_precedence: u8) -> Result<f64, ExpressionError> {
        let mut lhs = self.unary()?;

        while let Some(Token::Op(op)) = self.peek() {
            if op.precedence() < min_precedence {
                break;
            }
            self.pos += 1;

            let rhs = self.expression(op.precedence() + 1)?;
            lhs = op.apply(lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<f64, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Op(Operator::Sub)) => Ok(-self.unary()?),
            Some(Token::Op(Operator::Add)) => self.unary(),
            Some(token) => Err(ExpressionError::UnexpectedToken {
                position: self.pos - 1,
                token: token.to_string(),
            }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}
