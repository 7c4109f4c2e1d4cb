//! Notation conversion: postfix to infix and prefix
//!
//! The flat token sequence is replayed against a stack of sub-trees instead
//! of numbers (stack ops rearrange sub-trees the same way they rearrange
//! values), then the single remaining tree is rendered. Conversion never
//! evaluates anything.

use crate::display::format_number;
use crate::lexer::{StackOp, Token};
use crate::registry::{Associativity, InfixForm, Op};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    #[error("Cannot convert: '{token}' at token {position} is missing operands")]
    StackUnderflow { position: usize, token: String },
    #[error("Cannot convert: expression leaves {0} item(s), expected 1")]
    UnbalancedResult(usize),
}

/// An expression tree rebuilt from postfix tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(f64),
    Variable(String),
    Apply { op: Op, args: Vec<Node> },
}

impl Node {
    /// Binding strength of this node when it appears as an operand
    fn precedence(&self) -> u8 {
        match self {
            Node::Apply { op, .. } => match op.spec().infix {
                InfixForm::Binary => op.spec().precedence,
                InfixForm::Negate => negation_precedence(),
                InfixForm::Call => u8::MAX,
            },
            Node::Number(n) if n.is_sign_negative() && !n.is_nan() => negation_precedence(),
            _ => u8::MAX,
        }
    }
}

/// Unary minus binds like `**`: `-x ** 2` would read as `-(x ** 2)`
fn negation_precedence() -> u8 {
    Op::Pow.spec().precedence
}

/// Rebuild the expression tree from a postfix sequence
pub fn to_tree(tokens: &[Token]) -> Result<Node, NotationError> {
    let mut stack: Vec<Node> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if stack.len() < token.required() {
            return Err(NotationError::StackUnderflow {
                position,
                token: token.to_string(),
            });
        }
        match token {
            Token::Number(n) => stack.push(Node::Number(*n)),
            Token::Variable(name) => stack.push(Node::Variable(name.clone())),
            Token::Operator(op) | Token::Function(op) => {
                let args = stack.split_off(stack.len() - op.arity());
                stack.push(Node::Apply { op: *op, args });
            }
            Token::StackOp(op) => rearrange(&mut stack, *op),
        }
    }

    match stack.len() {
        1 => Ok(stack.remove(0)),
        n => Err(NotationError::UnbalancedResult(n)),
    }
}

/// Apply a stack op to sub-trees; the caller has checked the depth
fn rearrange(stack: &mut Vec<Node>, op: StackOp) {
    let len = stack.len();
    match op {
        StackOp::Dup => stack.push(stack[len - 1].clone()),
        StackOp::Swap => stack.swap(len - 1, len - 2),
        StackOp::Drop => {
            stack.pop();
        }
        StackOp::Rot => {
            let third = stack.remove(len - 3);
            stack.push(third);
        }
        StackOp::Over => stack.push(stack[len - 2].clone()),
    }
}

/// Render with every binary operation parenthesized: `((3 + 4) * 2)`
fn render_full(node: &Node) -> String {
    let (op, args) = match node {
        Node::Number(n) => return format_number(*n, None),
        Node::Variable(name) => return name.clone(),
        Node::Apply { op, args } => (op, args),
    };
    match op.spec().infix {
        InfixForm::Binary => format!("({} {} {})", render_full(&args[0]), op, render_full(&args[1])),
        InfixForm::Negate => format!("(-{})", render_full(&args[0])),
        InfixForm::Call => {
            let rendered: Vec<String> = args.iter().map(render_full).collect();
            format!("{}({})", op, rendered.join(", "))
        }
    }
}

/// Render with only the parentheses precedence and associativity require
fn render_minimal(node: &Node) -> String {
    let (op, args) = match node {
        Node::Number(n) => return format_number(*n, None),
        Node::Variable(name) => return name.clone(),
        Node::Apply { op, args } => (op, args),
    };
    let spec = op.spec();
    match spec.infix {
        InfixForm::Binary => {
            let wrap = |child: &Node, right_side: bool| {
                let text = render_minimal(child);
                let child_prec = child.precedence();
                let needs_parens = child_prec < spec.precedence
                    || (child_prec == spec.precedence
                        && match spec.associativity {
                            Associativity::Left => right_side,
                            Associativity::Right => !right_side,
                        });
                if needs_parens {
                    format!("({})", text)
                } else {
                    text
                }
            };
            format!("{} {} {}", wrap(&args[0], false), op, wrap(&args[1], true))
        }
        InfixForm::Negate => {
            let inner = render_minimal(&args[0]);
            if args[0].precedence() < u8::MAX {
                format!("-({})", inner)
            } else {
                format!("-{}", inner)
            }
        }
        InfixForm::Call => {
            let rendered: Vec<String> = args.iter().map(render_minimal).collect();
            format!("{}({})", op, rendered.join(", "))
        }
    }
}

/// Render in prefix order: `operator operand1 operand2`
fn render_prefix(node: &Node) -> String {
    let (op, args) = match node {
        Node::Number(n) => return format_number(*n, None),
        Node::Variable(name) => return name.clone(),
        Node::Apply { op, args } => (op, args),
    };
    let mut parts = vec![op.symbol().to_string()];
    parts.extend(args.iter().map(render_prefix));
    parts.join(" ")
}

/// Fully parenthesized infix: `3 4 + 2 *` renders as `((3 + 4) * 2)`
pub fn to_infix(tokens: &[Token]) -> Result<String, NotationError> {
    Ok(render_full(&to_tree(tokens)?))
}

/// Infix with minimal parentheses: `3 4 + 2 *` renders as `(3 + 4) * 2`
pub fn to_infix_minimal(tokens: &[Token]) -> Result<String, NotationError> {
    Ok(render_minimal(&to_tree(tokens)?))
}

/// Prefix: `3 4 +` renders as `+ 3 4`
pub fn to_prefix(tokens: &[Token]) -> Result<String, NotationError> {
    Ok(render_prefix(&to_tree(tokens)?))
}
