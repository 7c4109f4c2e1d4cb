use super::{EvalError, Evaluator};
use crate::lexer::Token;
use crate::registry::{MathError, Op};

impl Evaluator {
    /// Pop operands for `op`, apply its registry function, push the result
    pub(crate) fn apply_op(&mut self, position: usize, token: &Token, op: Op) -> Result<(), EvalError> {
        let spec = op.spec();
        let mut operands = self.pop_operands(position, token, spec.arity)?;

        if op.is_trig() {
            operands[0] = self.config.angle_unit.to_radians(operands[0]);
        }

        let result = (spec.apply)(&operands).map_err(|e| match e {
            MathError::DivisionByZero => EvalError::DivisionByZero {
                position,
                operator: spec.symbol,
            },
            MathError::Domain(value) => EvalError::DomainError {
                function: spec.symbol,
                value,
            },
        })?;

        self.push(result)
    }
}
