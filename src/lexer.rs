//! Tokenization for rpnx
//!
//! Source text is split on whitespace into atoms, and each atom is classified
//! in a single left-to-right pass: number literal, operator, stack op,
//! function, constant, `${name}` placeholder, or bare variable name.

use crate::display::format_number;
use crate::registry::{self, Op, OpKind};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of},
    combinator::{all_consuming, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use std::fmt;
use thiserror::Error;

/// Stack rearrangements that never combine values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    Dup,
    Swap,
    Drop,
    Rot,
    Over,
}

impl StackOp {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "dup" => Some(StackOp::Dup),
            "swap" => Some(StackOp::Swap),
            "drop" => Some(StackOp::Drop),
            "rot" => Some(StackOp::Rot),
            "over" => Some(StackOp::Over),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            StackOp::Dup => "dup",
            StackOp::Swap => "swap",
            StackOp::Drop => "drop",
            StackOp::Rot => "rot",
            StackOp::Over => "over",
        }
    }

    /// Minimum stack depth the op needs
    pub fn required(self) -> usize {
        match self {
            StackOp::Dup | StackOp::Drop => 1,
            StackOp::Swap | StackOp::Over => 2,
            StackOp::Rot => 3,
        }
    }

    /// Net change in stack depth
    pub fn delta(self) -> isize {
        match self {
            StackOp::Dup | StackOp::Over => 1,
            StackOp::Swap | StackOp::Rot => 0,
            StackOp::Drop => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal (constants are folded to this too)
    Number(f64),
    /// A name resolved at evaluation time
    Variable(String),
    /// An operator symbol: `+ - * / ** == AND NOT ...`
    Operator(Op),
    /// A stack rearrangement: `dup swap drop rot over`
    StackOp(StackOp),
    /// A named function: `sqrt sin max ...`
    Function(Op),
}

impl Token {
    /// Build the token for a registry entry, picking Operator or Function by kind
    pub fn op(op: Op) -> Self {
        match op.kind() {
            OpKind::Operator => Token::Operator(op),
            OpKind::Function => Token::Function(op),
        }
    }

    /// Stack depth this token needs before it runs
    pub fn required(&self) -> usize {
        match self {
            Token::Number(_) | Token::Variable(_) => 0,
            Token::Operator(op) | Token::Function(op) => op.arity(),
            Token::StackOp(op) => op.required(),
        }
    }

    /// Net change in stack depth after this token runs
    pub fn delta(&self) -> isize {
        match self {
            Token::Number(_) | Token::Variable(_) => 1,
            Token::Operator(op) | Token::Function(op) => 1 - op.arity() as isize,
            Token::StackOp(op) => op.delta(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) if n.is_nan() => f.write_str("nan"),
            Token::Number(n) => f.write_str(&format_number(*n, None)),
            // A bare reserved word would lex back as something else
            Token::Variable(name) if registry::is_reserved(name) => write!(f, "${{{}}}", name),
            Token::Variable(name) => f.write_str(name),
            Token::Operator(op) | Token::Function(op) => f.write_str(op.symbol()),
            Token::StackOp(op) => f.write_str(op.keyword()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Invalid token '{atom}' at offset {offset}")]
    InvalidToken { atom: String, offset: usize },
    #[error("Malformed placeholder '{atom}' at offset {offset}, expected ${{name}}")]
    MalformedPlaceholder { atom: String, offset: usize },
    #[error("Expected exactly one token, got '{0}'")]
    NotSingleToken(String),
}

/// Parse a numeric literal: `-12`, `3.5`, `6.02e23`, `1E-9`
fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Parse an identifier: a letter or underscore, then letters, digits, underscores
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Parse a template placeholder: `${name}`
fn placeholder(input: &str) -> IResult<&str, &str> {
    delimited(tag("${"), identifier, char('}'))(input)
}

/// Parse one whitespace-delimited atom
fn atom(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace()))(input)
}

fn matches_fully<'a, F>(parser: F, input: &'a str) -> Option<&'a str>
where
    F: FnMut(&'a str) -> IResult<&'a str, &'a str>,
{
    all_consuming(parser)(input).ok().map(|(_, matched)| matched)
}

/// Classify a single atom
fn classify(word: &str, offset: usize) -> Result<Token, LexError> {
    if let Some(literal) = matches_fully(number, word) {
        let value = literal.parse::<f64>().map_err(|_| LexError::InvalidToken {
            atom: word.to_string(),
            offset,
        })?;
        return Ok(Token::Number(value));
    }
    if let Some(spec) = registry::lookup(word) {
        return Ok(Token::op(spec.op));
    }
    if let Some(op) = StackOp::from_keyword(word) {
        return Ok(Token::StackOp(op));
    }
    if let Some(value) = registry::constant(word) {
        return Ok(Token::Number(value));
    }
    if let Some(value) = word.strip_prefix('-').and_then(registry::constant) {
        return Ok(Token::Number(-value));
    }
    if word.starts_with("${") {
        return matches_fully(placeholder, word)
            .map(|name| Token::Variable(name.to_string()))
            .ok_or_else(|| LexError::MalformedPlaceholder {
                atom: word.to_string(),
                offset,
            });
    }
    if let Some(name) = matches_fully(identifier, word) {
        return Ok(Token::Variable(name.to_string()));
    }
    Err(LexError::InvalidToken {
        atom: word.to_string(),
        offset,
    })
}

/// Tokenize a complete input string
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Ok((remaining, word)) = atom(rest) {
        let offset = input.len() - remaining.len() - word.len();
        tokens.push(classify(word, offset)?);
        rest = remaining;
    }

    Ok(tokens)
}

/// Tokenize text that must hold exactly one token
pub fn lex_atom(input: &str) -> Result<Token, LexError> {
    let mut tokens = lex(input)?;
    if tokens.len() != 1 {
        return Err(LexError::NotSingleToken(input.to_string()));
    }
    Ok(tokens.remove(0))
}

/// Render tokens in canonical text form: display forms, space-joined
pub fn to_source(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
