//! Operator and function registry
//!
//! A static table mapping every operator symbol and function name to its
//! arity, evaluation function, infix precedence and display form.
//! The tokenizer, validator, evaluator, builder and notation converter all
//! read from this one table.

/// Stack operations recognized as keywords
pub const STACK_OPS: &[&str] = &["dup", "swap", "drop", "rot", "over"];

/// Named constants resolved to literals at tokenization
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
    ("inf", f64::INFINITY),
    ("nan", f64::NAN),
    ("true", 1.0),
    ("false", 0.0),
];

/// Every operator and function the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Not,
    Sqrt,
    Abs,
    Neg,
    Ln,
    Exp,
    Sin,
    Cos,
    Tan,
    Log,
    Ceil,
    Floor,
    Round,
    Max,
    Min,
}

/// Whether a registry entry is written as an operator symbol or a function name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Operator,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// How a node built from this entry renders in infix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixForm {
    /// `(left sym right)`
    Binary,
    /// `name(arg, ...)`
    Call,
    /// `(-arg)`
    Negate,
}

/// Failure raised by a registry function; the evaluator attaches context
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    DivisionByZero,
    Domain(f64),
}

pub type OpFn = fn(&[f64]) -> Result<f64, MathError>;

/// One registry entry
#[derive(Debug, Clone, Copy)]
pub struct OperatorSpec {
    pub op: Op,
    /// Canonical spelling, used for display
    pub symbol: &'static str,
    /// Additional accepted spellings
    pub aliases: &'static [&'static str],
    pub kind: OpKind,
    pub arity: usize,
    /// Binding strength for infix rendering, higher binds tighter
    pub precedence: u8,
    pub associativity: Associativity,
    pub infix: InfixForm,
    pub apply: OpFn,
}

const fn binary(
    op: Op,
    symbol: &'static str,
    aliases: &'static [&'static str],
    precedence: u8,
    associativity: Associativity,
    apply: OpFn,
) -> OperatorSpec {
    OperatorSpec {
        op,
        symbol,
        aliases,
        kind: OpKind::Operator,
        arity: 2,
        precedence,
        associativity,
        infix: InfixForm::Binary,
        apply,
    }
}

const fn function(
    op: Op,
    symbol: &'static str,
    aliases: &'static [&'static str],
    kind: OpKind,
    arity: usize,
    infix: InfixForm,
    apply: OpFn,
) -> OperatorSpec {
    OperatorSpec {
        op,
        symbol,
        aliases,
        kind,
        arity,
        precedence: u8::MAX,
        associativity: Associativity::Left,
        infix,
        apply,
    }
}

use Associativity::{Left, Right};

/// The registry table
pub static OPERATORS: &[OperatorSpec] = &[
    // Arithmetic
    binary(Op::Add, "+", &[], 4, Left, |a| Ok(a[0] + a[1])),
    binary(Op::Sub, "-", &[], 4, Left, |a| Ok(a[0] - a[1])),
    binary(Op::Mul, "*", &[], 5, Left, |a| Ok(a[0] * a[1])),
    binary(Op::Div, "/", &[], 5, Left, divide),
    binary(Op::FloorDiv, "//", &[], 5, Left, floor_divide),
    binary(Op::Mod, "%", &[], 5, Left, modulo),
    binary(Op::Pow, "**", &["pow"], 6, Right, |a| Ok(a[0].powf(a[1]))),
    // Comparison
    binary(Op::Eq, "==", &[], 3, Left, |a| Ok(truth(a[0] == a[1]))),
    binary(Op::Ne, "!=", &[], 3, Left, |a| Ok(truth(a[0] != a[1]))),
    binary(Op::Lt, "<", &[], 3, Left, |a| Ok(truth(a[0] < a[1]))),
    binary(Op::Gt, ">", &[], 3, Left, |a| Ok(truth(a[0] > a[1]))),
    binary(Op::Le, "<=", &[], 3, Left, |a| Ok(truth(a[0] <= a[1]))),
    binary(Op::Ge, ">=", &[], 3, Left, |a| Ok(truth(a[0] >= a[1]))),
    // Logic
    binary(Op::And, "AND", &["and"], 2, Left, |a| Ok(truth(a[0] != 0.0 && a[1] != 0.0))),
    binary(Op::Or, "OR", &["or"], 1, Left, |a| Ok(truth(a[0] != 0.0 || a[1] != 0.0))),
    function(Op::Not, "NOT", &["not"], OpKind::Operator, 1, InfixForm::Call, |a| Ok(truth(a[0] == 0.0))),
    // Unary math
    function(Op::Sqrt, "sqrt", &[], OpKind::Function, 1, InfixForm::Call, square_root),
    function(Op::Abs, "abs", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].abs())),
    function(Op::Neg, "neg", &[], OpKind::Function, 1, InfixForm::Negate, |a| Ok(-a[0])),
    function(Op::Ln, "ln", &[], OpKind::Function, 1, InfixForm::Call, natural_log),
    function(Op::Exp, "exp", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].exp())),
    function(Op::Sin, "sin", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].sin())),
    function(Op::Cos, "cos", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].cos())),
    function(Op::Tan, "tan", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].tan())),
    function(Op::Log, "log", &[], OpKind::Function, 1, InfixForm::Call, common_log),
    function(Op::Ceil, "ceil", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].ceil())),
    function(Op::Floor, "floor", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].floor())),
    function(Op::Round, "round", &[], OpKind::Function, 1, InfixForm::Call, |a| Ok(a[0].round())),
    // Binary functions
    function(Op::Max, "max", &[], OpKind::Function, 2, InfixForm::Call, |a| Ok(a[0].max(a[1]))),
    function(Op::Min, "min", &[], OpKind::Function, 2, InfixForm::Call, |a| Ok(a[0].min(a[1]))),
];

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn divide(a: &[f64]) -> Result<f64, MathError> {
    if a[1] == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a[0] / a[1])
}

fn floor_divide(a: &[f64]) -> Result<f64, MathError> {
    if a[1] == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok((a[0] / a[1]).floor())
}

/// Floored modulo: the result carries the sign of the divisor
fn modulo(a: &[f64]) -> Result<f64, MathError> {
    if a[1] == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    let r = a[0] % a[1];
    if r != 0.0 && (r < 0.0) != (a[1] < 0.0) {
        Ok(r + a[1])
    } else {
        Ok(r)
    }
}

fn square_root(a: &[f64]) -> Result<f64, MathError> {
    if a[0] < 0.0 {
        return Err(MathError::Domain(a[0]));
    }
    Ok(a[0].sqrt())
}

fn natural_log(a: &[f64]) -> Result<f64, MathError> {
    if a[0] <= 0.0 {
        return Err(MathError::Domain(a[0]));
    }
    Ok(a[0].ln())
}

fn common_log(a: &[f64]) -> Result<f64, MathError> {
    if a[0] <= 0.0 {
        return Err(MathError::Domain(a[0]));
    }
    Ok(a[0].log10())
}

impl Op {
    /// The registry entry for this op
    pub fn spec(self) -> &'static OperatorSpec {
        // The table holds exactly one entry per variant, in declaration order.
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.spec().symbol
    }

    pub fn arity(self) -> usize {
        self.spec().arity
    }

    pub fn kind(self) -> OpKind {
        self.spec().kind
    }

    /// Trigonometric functions are sensitive to the configured angle unit
    pub fn is_trig(self) -> bool {
        matches!(self, Op::Sin | Op::Cos | Op::Tan)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Look up an operator or function by any accepted spelling
pub fn lookup(word: &str) -> Option<&'static OperatorSpec> {
    OPERATORS
        .iter()
        .find(|spec| spec.symbol == word || spec.aliases.contains(&word))
}

/// Look up a named constant
pub fn constant(word: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

/// Check if a word is a stack operation keyword
pub fn is_stack_op(word: &str) -> bool {
    STACK_OPS.contains(&word)
}

/// Check if a word is reserved (operator, function, stack op or constant)
pub fn is_reserved(word: &str) -> bool {
    lookup(word).is_some() || is_stack_op(word) || constant(word).is_some()
}

/// Every spelling the tokenizer accepts, for completion and schema output
pub fn all_words() -> Vec<&'static str> {
    let mut words: Vec<&'static str> = OPERATORS
        .iter()
        .flat_map(|spec| std::iter::once(spec.symbol).chain(spec.aliases.iter().copied()))
        .collect();
    words.extend_from_slice(STACK_OPS);
    words.extend(CONSTANTS.iter().map(|(name, _)| *name));
    words
}
