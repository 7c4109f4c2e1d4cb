use super::{EvalError, Evaluator};
use crate::lexer::{StackOp, Token};

impl Evaluator {
    pub(crate) fn apply_stack_op(
        &mut self,
        position: usize,
        token: &Token,
        op: StackOp,
    ) -> Result<(), EvalError> {
        self.require(position, token, op.required())?;
        match op {
            StackOp::Dup => self.stack_dup(),
            StackOp::Swap => {
                self.stack_swap();
                Ok(())
            }
            StackOp::Drop => {
                self.stack.pop();
                Ok(())
            }
            StackOp::Rot => {
                self.stack_rot();
                Ok(())
            }
            StackOp::Over => self.stack_over(),
        }
    }

    /// a -> a a
    fn stack_dup(&mut self) -> Result<(), EvalError> {
        let top = self.stack[self.stack.len() - 1];
        self.push(top)
    }

    /// a b -> b a
    fn stack_swap(&mut self) {
        let len = self.stack.len();
        self.stack.swap(len - 1, len - 2);
    }

    /// x y z -> y z x
    fn stack_rot(&mut self) {
        let len = self.stack.len();
        let third = self.stack.remove(len - 3);
        self.stack.push(third);
    }

    /// a b -> a b a
    fn stack_over(&mut self) -> Result<(), EvalError> {
        let second = self.stack[self.stack.len() - 2];
        self.push(second)
    }
}
