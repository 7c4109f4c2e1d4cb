//! Expressions: an immutable token sequence plus default variable values
//!
//! An `Expression` is built once, from text or via the builder, and is never
//! mutated afterwards. Composition (`combine`, `pipe`) and partial binding
//! (`partial`) always produce new values, so expressions are safe to share
//! read-only across threads.

use crate::config::{self, Config};
use crate::eval::{self, Bindings, Defaults, EvalError};
use crate::lexer::{self, LexError, Token};
use crate::notation::{self, NotationError};
use crate::validate::{self, ValidationError, ValidationIssue};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Opaque key/value data carried for serialization only
pub type Metadata = BTreeMap<String, JsonValue>;

/// Failure to build an expression from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expression {
    tokens: Vec<Token>,
    #[serde(default, with = "defaults_serde")]
    defaults: Defaults,
    #[serde(default)]
    metadata: Metadata,
}

impl PartialEq for Expression {
    /// Metadata never takes part in equality
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens && self.defaults == other.defaults
    }
}

impl Expression {
    /// Tokenize source text without validating it
    pub fn parse(source: &str) -> Result<Self, LexError> {
        Ok(Self::from_tokens(lexer::lex(source)?))
    }

    /// Tokenize and validate, failing on the first issue
    pub fn parse_strict(source: &str) -> Result<Self, ParseError> {
        let expr = Self::parse(source)?;
        validate::validate_strict(&expr.tokens)?;
        Ok(expr)
    }

    /// Tokenize, validating only if `config.strict` is set
    pub fn parse_with(source: &str, config: &Config) -> Result<Self, ParseError> {
        if config.strict {
            Self::parse_strict(source)
        } else {
            Ok(Self::parse(source)?)
        }
    }

    /// Build from text with `${name}` placeholders
    pub fn template(source: &str) -> Result<Self, LexError> {
        Self::parse(source)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Expression {
            tokens,
            defaults: Defaults::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_defaults<I, K>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Distinct variable names, in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Variable(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Evaluate under the thread's current config
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        eval::evaluate(&self.tokens, bindings, &self.defaults)
    }

    /// Evaluate under an explicit config
    pub fn evaluate_with(&self, bindings: &Bindings, config: &Config) -> Result<f64, EvalError> {
        eval::evaluate_with(&self.tokens, bindings, &self.defaults, config)
    }

    /// Report every structural issue without evaluating
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        validate::validate(&self.tokens)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_infix(&self) -> Result<String, NotationError> {
        notation::to_infix(&self.tokens)
    }

    pub fn to_infix_minimal(&self) -> Result<String, NotationError> {
        notation::to_infix_minimal(&self.tokens)
    }

    pub fn to_prefix(&self) -> Result<String, NotationError> {
        notation::to_prefix(&self.tokens)
    }

    /// Concatenate `self`'s tokens followed by `next`'s
    ///
    /// Defaults and metadata are merged, `next` winning on conflicts. The
    /// result is whatever the validator says about the joined sequence: `next`
    /// may consume `self`'s result as its leading operand.
    pub fn combine(&self, next: &Expression) -> Expression {
        let mut tokens = self.tokens.clone();
        tokens.extend(next.tokens.iter().cloned());
        let mut defaults = self.defaults.clone();
        defaults.extend(next.defaults.iter().map(|(k, v)| (k.clone(), *v)));
        let mut metadata = self.metadata.clone();
        metadata.extend(next.metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        Expression {
            tokens,
            defaults,
            metadata,
        }
    }

    /// Chain `next` after `self`; `next` sees `self`'s result as `ans`
    pub fn pipe(&self, next: &Expression) -> Pipeline {
        Pipeline {
            first: self.clone(),
            second: next.clone(),
        }
    }

    /// A new expression with some variables pre-bound as defaults
    pub fn partial<I, K>(&self, values: I) -> Expression
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.clone().with_defaults(values)
    }

    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&lexer::to_source(&self.tokens))
    }
}

impl std::str::FromStr for Expression {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Concatenate two expressions
pub fn combine(first: &Expression, next: &Expression) -> Expression {
    first.combine(next)
}

/// Name under which a pipeline passes the first result to the second stage
pub const ANSWER: &str = "ans";

/// Two-step evaluation: run `first`, then `second` with `ans` defaulted to the result
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    first: Expression,
    second: Expression,
}

impl Pipeline {
    pub fn first(&self) -> &Expression {
        &self.first
    }

    pub fn second(&self) -> &Expression {
        &self.second
    }

    /// Evaluate under the thread's current config
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        self.evaluate_with(bindings, &config::current())
    }

    /// Evaluate both stages under an explicit config
    ///
    /// An explicit `ans` binding still wins over the piped value.
    pub fn evaluate_with(&self, bindings: &Bindings, config: &Config) -> Result<f64, EvalError> {
        let answer = self.first.evaluate_with(bindings, config)?;
        let mut defaults = self.second.defaults.clone();
        defaults.insert(ANSWER.to_string(), answer);
        eval::evaluate_with(&self.second.tokens, bindings, &defaults, config)
    }
}

// Tokens serialize as JSON numbers (for literals) or their display text.

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Token::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = Token;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a single RPN token")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Token, E> {
        Ok(Token::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Token, E> {
        Ok(Token::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Token, E> {
        Ok(Token::Number(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Token, E> {
        // Non-finite numbers arrive as `inf`, `-inf` or `nan`, which lex as constants
        lexer::lex_atom(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

/// Default values share the token encoding so non-finite values survive JSON
mod defaults_serde {
    use super::*;
    use serde::ser::SerializeMap;

    pub fn serialize<S: Serializer>(defaults: &Defaults, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(defaults.len()))?;
        for (name, value) in defaults {
            map.serialize_entry(name, &Token::Number(*value))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Defaults, D::Error> {
        BTreeMap::<String, Token>::deserialize(deserializer)?
            .into_iter()
            .map(|(name, token)| match token {
                Token::Number(value) => Ok((name, value)),
                other => Err(de::Error::custom(format!(
                    "default for '{}' must be a number, got '{}'",
                    name, other
                ))),
            })
            .collect()
    }
}
