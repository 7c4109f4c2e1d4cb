use super::{Bindings, Defaults, EvalError, Evaluator};
use crate::lexer::Token;

impl Evaluator {
    /// Push a value, enforcing the configured stack limit
    pub(crate) fn push(&mut self, value: f64) -> Result<(), EvalError> {
        if self.stack.len() >= self.config.max_stack_size {
            return Err(EvalError::StackOverflow(self.config.max_stack_size));
        }
        self.stack.push(value);
        Ok(())
    }

    /// Fail unless the stack holds at least `required` items
    pub(crate) fn require(
        &self,
        position: usize,
        token: &Token,
        required: usize,
    ) -> Result<(), EvalError> {
        if self.stack.len() < required {
            return Err(EvalError::StackUnderflow {
                position,
                token: token.to_string(),
                required,
                available: self.stack.len(),
            });
        }
        Ok(())
    }

    /// Pop the top `n` values, returned in push order (leftmost operand first)
    pub(crate) fn pop_operands(
        &mut self,
        position: usize,
        token: &Token,
        n: usize,
    ) -> Result<Vec<f64>, EvalError> {
        self.require(position, token, n)?;
        let at = self.stack.len() - n;
        Ok(self.stack.split_off(at))
    }

    /// Resolve a variable: explicit bindings win over defaults
    pub(crate) fn resolve(
        name: &str,
        bindings: &Bindings,
        defaults: &Defaults,
    ) -> Result<f64, EvalError> {
        bindings
            .get(name)
            .or_else(|| defaults.get(name))
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }
}
