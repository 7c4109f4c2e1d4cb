//! Fluent construction of postfix token sequences
//!
//! Two styles are offered:
//!
//! - [`ExprBuilder`] accumulates tokens the way you would type them, tracking
//!   a virtual stack depth so an operation without enough operands fails at
//!   the offending call rather than at evaluation.
//! - [`Expr`] composes algebraically. Every `Expr` stands for exactly one
//!   value, so binary methods take the other operand as an argument and emit
//!   `left right op` in textual order.
//!
//! ```
//! use rpnx::builder::{Expr, ExprBuilder};
//!
//! let built = ExprBuilder::new().push(3).push(4).add().unwrap();
//! assert_eq!(built.to_string(), "3 4 +");
//!
//! // A literal on the left keeps its place even when the call starts from `x`
//! assert_eq!(Expr::var("x").rsub(10).to_string(), "10 x -");
//! ```

use crate::eval::Bindings;
use crate::expr::Expression;
use crate::lexer::{self, StackOp, Token};
use crate::registry::Op;
use crate::validate::{self, ValidationError};
use crate::RpnError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    #[error("'{operation}' needs {required} operand(s), only {available} available")]
    StackUnderflow {
        operation: String,
        required: usize,
        available: usize,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Anything that can stand as one operand: a literal, a variable, or a sub-expression
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Variable(String),
    Expr(Expr),
}

impl Operand {
    fn into_tokens(self) -> Vec<Token> {
        match self {
            Operand::Number(n) => vec![Token::Number(n)],
            Operand::Variable(name) => vec![Token::Variable(name)],
            Operand::Expr(expr) => expr.tokens,
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Number(value)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Number(value as f64)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Variable(name.to_string())
    }
}

impl From<String> for Operand {
    fn from(name: String) -> Self {
        Operand::Variable(name)
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

// ---------------------------------------------------------------------------
// Accumulating builder
// ---------------------------------------------------------------------------

/// Generate builder methods that append one registry op
macro_rules! builder_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($op), "`, consuming its operands")]
            pub fn $name(self) -> Result<Self, BuilderError> {
                self.apply(Token::op(Op::$op))
            }
        )*
    };
}

/// Generate builder methods that append one stack op
macro_rules! builder_stack_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(self) -> Result<Self, BuilderError> {
                self.apply(Token::StackOp(StackOp::$op))
            }
        )*
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprBuilder {
    tokens: Vec<Token>,
    depth: usize,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a numeric literal
    pub fn push(mut self, value: impl Into<f64>) -> Self {
        self.tokens.push(Token::Number(value.into()));
        self.depth += 1;
        self
    }

    /// Push a variable reference
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.tokens.push(Token::Variable(name.into()));
        self.depth += 1;
        self
    }

    /// Push any operand; sub-expressions are flattened in place
    pub fn operand(mut self, operand: impl Into<Operand>) -> Self {
        self.tokens.extend(operand.into().into_tokens());
        self.depth += 1;
        self
    }

    /// Append a token after checking the virtual stack
    pub fn apply(mut self, token: Token) -> Result<Self, BuilderError> {
        let required = token.required();
        if self.depth < required {
            return Err(BuilderError::StackUnderflow {
                operation: token.to_string(),
                required,
                available: self.depth,
            });
        }
        self.depth = self.depth.saturating_add_signed(token.delta());
        self.tokens.push(token);
        Ok(self)
    }

    builder_ops! {
        add => Add, sub => Sub, mul => Mul, div => Div, floor_div => FloorDiv,
        modulo => Mod, pow => Pow,
        equals => Eq, not_equals => Ne, less => Lt, greater => Gt,
        less_eq => Le, greater_eq => Ge,
        and => And, or => Or, not => Not,
        sqrt => Sqrt, abs => Abs, neg => Neg, ln => Ln, exp => Exp,
        sin => Sin, cos => Cos, tan => Tan, log => Log,
        ceil => Ceil, floor => Floor, round => Round, max => Max, min => Min,
    }

    builder_stack_ops! {
        dup => Dup, swap => Swap, drop => Drop, rot => Rot, over => Over,
    }

    /// Current virtual stack depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Finish, validating that the sequence reduces to one value
    pub fn build(self) -> Result<Expression, BuilderError> {
        validate::validate_strict(&self.tokens)?;
        Ok(Expression::from_tokens(self.tokens))
    }

    /// Build and evaluate in one step
    pub fn evaluate(self, bindings: &Bindings) -> Result<f64, RpnError> {
        Ok(self.build()?.evaluate(bindings)?)
    }
}

impl fmt::Display for ExprBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&lexer::to_source(&self.tokens))
    }
}

// ---------------------------------------------------------------------------
// Algebraic composition
// ---------------------------------------------------------------------------

/// Generate `self op rhs` methods
macro_rules! binary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(self, rhs: impl Into<Operand>) -> Expr {
                self.binary(Op::$op, rhs.into())
            }
        )*
    };
}

/// Generate `lhs op self` methods, for a left operand that is not an `Expr` yet
macro_rules! reflected_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(self, lhs: impl Into<Operand>) -> Expr {
                let lhs: Operand = lhs.into();
                Expr::from(lhs).binary(Op::$op, Operand::Expr(self))
            }
        )*
    };
}

macro_rules! unary_ops {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(mut self) -> Expr {
                self.tokens.push(Token::op(Op::$op));
                self
            }
        )*
    };
}

/// A complete sub-expression that leaves exactly one value
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    tokens: Vec<Token>,
}

impl Expr {
    pub fn num(value: impl Into<f64>) -> Self {
        Expr {
            tokens: vec![Token::Number(value.into())],
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr {
            tokens: vec![Token::Variable(name.into())],
        }
    }

    fn binary(mut self, op: Op, rhs: Operand) -> Expr {
        self.tokens.extend(rhs.into_tokens());
        self.tokens.push(Token::op(op));
        self
    }

    binary_ops! {
        add => Add, sub => Sub, mul => Mul, div => Div, floor_div => FloorDiv,
        modulo => Mod, pow => Pow,
        equals => Eq, not_equals => Ne, less => Lt, greater => Gt,
        less_eq => Le, greater_eq => Ge,
        and => And, or => Or, max => Max, min => Min,
    }

    reflected_ops! {
        radd => Add, rsub => Sub, rmul => Mul, rdiv => Div,
        rfloor_div => FloorDiv, rmodulo => Mod, rpow => Pow,
    }

    unary_ops! {
        not => Not, sqrt => Sqrt, abs => Abs, neg => Neg, ln => Ln, exp => Exp,
        sin => Sin, cos => Cos, tan => Tan, log => Log,
        ceil => Ceil, floor => Floor, round => Round,
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Finish as an `Expression`; an `Expr` is well-formed by construction
    pub fn build(self) -> Expression {
        Expression::from_tokens(self.tokens)
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, RpnError> {
        Ok(self.clone().build().evaluate(bindings)?)
    }
}

impl From<Operand> for Expr {
    fn from(operand: Operand) -> Self {
        Expr {
            tokens: operand.into_tokens(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&lexer::to_source(&self.tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationIssue;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_simple_addition() {
        let b = ExprBuilder::new().push(3).push(4).add().unwrap();
        assert_eq!(b.to_string(), "3 4 +");
        assert_eq!(b.depth(), 1);
        assert_eq!(b.build().unwrap().evaluate(&Bindings::new()).unwrap(), 7.0);
    }

    #[test]
    fn builder_underflow_fails_at_call() {
        let err = ExprBuilder::new().push(3).add().unwrap_err();
        assert_eq!(
            err,
            BuilderError::StackUnderflow {
                operation: "+".to_string(),
                required: 2,
                available: 1,
            }
        );
        assert!(ExprBuilder::new().push(1).push(2).rot().is_err());
    }

    #[test]
    fn builder_build_rejects_leftovers() {
        let err = ExprBuilder::new().push(1).push(2).build().unwrap_err();
        assert_eq!(
            err,
            BuilderError::Validation(ValidationError(ValidationIssue::UnbalancedResult { depth: 2 }))
        );
    }

    #[test]
    fn builder_stack_ops_track_depth() {
        let b = ExprBuilder::new().push(5).dup().unwrap();
        assert_eq!(b.depth(), 2);
        let b = b.mul().unwrap();
        assert_eq!(b.to_string(), "5 dup *");

        let b = ExprBuilder::new()
            .push(10)
            .push(3)
            .over()
            .unwrap()
            .swap()
            .unwrap()
            .div()
            .unwrap()
            .add()
            .unwrap();
        assert_eq!(b.to_string(), "10 3 over swap / +");
        let result = b.evaluate(&Bindings::new()).unwrap();
        assert!((result - 40.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn builder_flattens_operands() {
        let inner = Expr::var("x").mul(2);
        let b = ExprBuilder::new().push(1).operand(inner).add().unwrap();
        assert_eq!(b.to_string(), "1 x 2 * +");
        assert_eq!(b.depth(), 1);
    }

    #[test]
    fn expr_emits_textual_order() {
        assert_eq!(Expr::num(10).sub("x").to_string(), "10 x -");
        assert_eq!(Expr::var("x").rsub(10).to_string(), "10 x -");
        assert_eq!(Expr::var("x").sub(10).to_string(), "x 10 -");
        assert_eq!(Expr::var("y").rdiv(1).to_string(), "1 y /");
        assert_eq!(Expr::var("n").rpow(2).to_string(), "2 n **");
        assert_eq!(Expr::var("d").rfloor_div(7).to_string(), "7 d //");
        assert_eq!(Expr::var("m").rmodulo(7).to_string(), "7 m %");
    }

    #[test]
    fn reflected_floor_div_and_modulo_evaluate() {
        let vars: Bindings = [("d".to_string(), 2.0)].into_iter().collect();
        assert_eq!(Expr::var("d").rfloor_div(7).evaluate(&vars).unwrap(), 3.0);
        assert_eq!(Expr::var("d").rmodulo(7).evaluate(&vars).unwrap(), 1.0);
        assert_eq!(Expr::var("d").rmodulo(-7).evaluate(&vars).unwrap(), 1.0);
    }

    #[test]
    fn expr_nested_composition() {
        let sum = Expr::num(3).add(4);
        let e = sum.mul(2);
        assert_eq!(e.to_string(), "3 4 + 2 *");

        let e = Expr::var("a").mul(Expr::var("b").add("c"));
        assert_eq!(e.to_string(), "a b c + *");
        assert_eq!(e.clone().build().to_infix().unwrap(), "(a * (b + c))");
    }

    #[test]
    fn expr_unary_and_logic() {
        let e = Expr::var("x").greater(10).and(Expr::var("x").less(20));
        assert_eq!(e.to_string(), "x 10 > x 20 < AND");
        let bindings: Bindings = [("x".to_string(), 15.0)].into_iter().collect();
        assert_eq!(e.evaluate(&bindings).unwrap(), 1.0);

        assert_eq!(Expr::num(16).sqrt().neg().to_string(), "16 sqrt neg");
        assert_eq!(Expr::var("p").not().to_string(), "p NOT");
    }

    #[test]
    fn expr_is_always_valid() {
        let e = Expr::var("a").pow(Expr::num(2)).add(Expr::var("b").abs()).max(0);
        assert!(e.build().is_valid());
    }

    #[test]
    fn expr_evaluate_reports_eval_errors() {
        let err = Expr::num(1).div(0).evaluate(&Bindings::new()).unwrap_err();
        assert!(matches!(err, RpnError::Eval(_)));
    }
}
