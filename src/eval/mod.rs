//! Evaluator for rpnx - a stack machine over f64
//!
//! Tokens are scanned left to right against an explicit value stack:
//! - Numbers push themselves
//! - Variables resolve through the bindings, then the defaults, and push
//! - Operators and functions pop their arity's worth of operands, apply the
//!   registry function, and push the result
//! - Stack ops rearrange the stack in place
//!
//! Binary operands are applied as (second-popped, first-popped), so the value
//! pushed earlier is the left operand. After the scan exactly one value must
//! remain.

mod helpers;
mod math;
mod stack;
mod tests;

use crate::config::{self, Config};
use crate::lexer::Token;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Variable values supplied fresh for a single evaluation
pub type Bindings = HashMap<String, f64>;

/// Variable values carried by an expression
pub type Defaults = BTreeMap<String, f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unbound variable: '{0}'")]
    UnboundVariable(String),
    #[error("Division by zero in '{operator}' at token {position}")]
    DivisionByZero {
        position: usize,
        operator: &'static str,
    },
    #[error("Domain error: {function}({value}) is undefined")]
    DomainError { function: &'static str, value: f64 },
    #[error("Stack underflow at token {position}: '{token}' requires {required} item(s), but stack has {available}")]
    StackUnderflow {
        position: usize,
        token: String,
        required: usize,
        available: usize,
    },
    #[error("Expression left {0} item(s) on stack, expected 1")]
    UnbalancedResult(usize),
    #[error("Stack overflow: more than {0} items")]
    StackOverflow(usize),
}

/// The evaluator owns a value stack and the config it evaluates under
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// The value stack
    pub(crate) stack: Vec<f64>,
    pub(crate) config: Config,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator using the thread's current config
    pub fn new() -> Self {
        Self::with_config(config::current())
    }

    pub fn with_config(config: Config) -> Self {
        Evaluator {
            stack: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the current stack (for debugging)
    pub fn stack(&self) -> &[f64] {
        &self.stack
    }

    /// Evaluate a token sequence to a single value
    ///
    /// The stack is cleared first, so one evaluator can be reused.
    pub fn eval(
        &mut self,
        tokens: &[Token],
        bindings: &Bindings,
        defaults: &Defaults,
    ) -> Result<f64, EvalError> {
        self.stack.clear();

        for (position, token) in tokens.iter().enumerate() {
            self.step(position, token, bindings, defaults)?;
            tracing::trace!(position, token = %token, depth = self.stack.len(), "step");
        }

        match self.stack.as_slice() {
            [result] => {
                tracing::debug!(tokens = tokens.len(), result, "evaluated");
                Ok(*result)
            }
            other => Err(EvalError::UnbalancedResult(other.len())),
        }
    }

    /// Execute one token against the stack
    pub(crate) fn step(
        &mut self,
        position: usize,
        token: &Token,
        bindings: &Bindings,
        defaults: &Defaults,
    ) -> Result<(), EvalError> {
        match token {
            Token::Number(n) => self.push(*n),
            Token::Variable(name) => {
                let value = Self::resolve(name, bindings, defaults)?;
                self.push(value)
            }
            Token::Operator(op) | Token::Function(op) => self.apply_op(position, token, *op),
            Token::StackOp(op) => self.apply_stack_op(position, token, *op),
        }
    }
}

/// Evaluate tokens with a fresh evaluator under the thread's current config
pub fn evaluate(tokens: &[Token], bindings: &Bindings, defaults: &Defaults) -> Result<f64, EvalError> {
    Evaluator::new().eval(tokens, bindings, defaults)
}

/// Evaluate tokens with a fresh evaluator under an explicit config
pub fn evaluate_with(
    tokens: &[Token],
    bindings: &Bindings,
    defaults: &Defaults,
    config: &Config,
) -> Result<f64, EvalError> {
    Evaluator::with_config(*config).eval(tokens, bindings, defaults)
}
