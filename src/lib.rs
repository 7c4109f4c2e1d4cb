//! rpnx - Reverse Polish Notation expressions
//!
//! # Overview
//!
//! rpnx tokenizes, validates, evaluates and pretty-prints postfix formulas.
//! Operands come first and operators follow them, so evaluation is a single
//! left-to-right pass over a stack with no precedence rules to apply.
//!
//! # Core Concepts
//!
//! ## Stack-Based Evaluation
//!
//! ```text
//! 3 4 +            # push 3, push 4, + pops both and pushes 7
//! 10 3 -           # the operand pushed first is the left one: 10 - 3
//! 5 dup *          # stack ops rearrange values: 5 5 * = 25
//! ```
//!
//! ## Variables and Templates
//!
//! ```text
//! price tax +          # bare names resolve from bindings, then defaults
//! ${price} ${tax} +    # template placeholders, same meaning
//! ```
//!
//! ## Notation
//!
//! ```text
//! 3 4 + 2 *        # infix: ((3 + 4) * 2)   prefix: * + 3 4 2
//! ```
//!
//! # Example
//!
//! ```rust
//! use rpnx::{Bindings, Expression};
//!
//! let expr = Expression::parse_strict("x 2 * 1 +").unwrap();
//! let bindings: Bindings = [("x".to_string(), 20.0)].into_iter().collect();
//! assert_eq!(expr.evaluate(&bindings).unwrap(), 41.0);
//! assert_eq!(expr.to_infix().unwrap(), "((x * 2) + 1)");
//! ```

pub mod builder;
pub mod config;
pub mod display;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod notation;
pub mod registry;
pub mod schema;
pub mod validate;

use std::sync::Once;
use thiserror::Error;

// Re-export commonly used items
pub use builder::{BuilderError, Expr, ExprBuilder, Operand};
pub use config::{AngleUnit, Config, ConfigError};
pub use eval::{evaluate, evaluate_with, Bindings, Defaults, EvalError, Evaluator};
pub use expr::{combine, Expression, ParseError, Pipeline, SerializeError};
pub use lexer::{lex, LexError, StackOp, Token};
pub use notation::{to_infix, to_infix_minimal, to_prefix, NotationError};
pub use registry::Op;
pub use validate::{validate, ValidationError, ValidationIssue};

/// Any failure the engine can report, for callers that want a single error type
#[derive(Error, Debug)]
pub enum RpnError {
    #[error("Tokenization error: {0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("Builder error: {0}")]
    Builder(#[from] BuilderError),
    #[error("{0}")]
    Notation(#[from] NotationError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),
}

impl From<ParseError> for RpnError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(e) => RpnError::Lex(e),
            ParseError::Validation(e) => RpnError::Validation(e),
        }
    }
}

/// Convenience function to evaluate a self-contained expression
pub fn eval(input: &str) -> Result<f64, RpnError> {
    let expr = Expression::parse_with(input, &config::current())?;
    Ok(expr.evaluate(&Bindings::new())?)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for debug output
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set or
/// `force` is true, in which case rpnx events are shown at trace level.
pub fn init_tracing(force: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if force {
            EnvFilter::new("rpnx=trace")
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
