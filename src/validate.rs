//! Structural validation
//!
//! Simulates stack depth over a token sequence without computing any values.
//! Variables are assumed to resolve. A well-formed sequence never underflows
//! and leaves exactly one value.

use crate::lexer::Token;
use crate::registry::OpKind;
use thiserror::Error;

/// One problem found while simulating stack depth
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("Token {position}: '{token}' requires {required} operand(s), but stack has {available}")]
    StackUnderflow {
        position: usize,
        token: String,
        required: usize,
        available: usize,
    },
    #[error("Expression leaves {depth} item(s) on stack, expected 1")]
    UnbalancedResult { depth: usize },
    #[error("Token {position}: '{token}' is not a registered {kind}")]
    UnknownToken {
        position: usize,
        token: String,
        kind: &'static str,
    },
}

/// Raised by strict construction on the first issue found
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation failed: {0}")]
pub struct ValidationError(pub ValidationIssue);

impl ValidationError {
    pub fn issue(&self) -> &ValidationIssue {
        &self.0
    }
}

/// A `Token::Operator` must hold an operator and a `Token::Function` a function
fn check_registered(position: usize, token: &Token) -> Option<ValidationIssue> {
    let (op, expected) = match token {
        Token::Operator(op) => (op, OpKind::Operator),
        Token::Function(op) => (op, OpKind::Function),
        _ => return None,
    };
    if op.kind() == expected {
        return None;
    }
    Some(ValidationIssue::UnknownToken {
        position,
        token: token.to_string(),
        kind: match expected {
            OpKind::Operator => "operator",
            OpKind::Function => "function",
        },
    })
}

/// Validate a token sequence, collecting every issue
///
/// After an underflow the simulation continues as if the missing operands had
/// been present, so later issues are still reported.
pub fn validate(tokens: &[Token]) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let mut depth: usize = 0;

    for (position, token) in tokens.iter().enumerate() {
        if let Some(issue) = check_registered(position, token) {
            issues.push(issue);
        }

        let required = token.required();
        if depth < required {
            issues.push(ValidationIssue::StackUnderflow {
                position,
                token: token.to_string(),
                required,
                available: depth,
            });
            depth = required;
        }
        depth = depth.saturating_add_signed(token.delta());
    }

    if depth != 1 {
        issues.push(ValidationIssue::UnbalancedResult { depth });
    }

    tracing::debug!(tokens = tokens.len(), issues = issues.len(), "validated");

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate and fail on the first issue
pub fn validate_strict(tokens: &[Token]) -> Result<(), ValidationError> {
    validate(tokens).map_err(|mut issues| ValidationError(issues.remove(0)))
}
