//! Integration tests for combine, pipe, partial and templates

#[path = "common/mod.rs"]
mod common;
use common::{bindings, EvalError, Expression};
use rpnx::combine;

#[test]
fn test_combine_extends_result() {
    let a = Expression::parse("3 4 +").unwrap();
    let b = Expression::parse("2 *").unwrap();
    let combined = combine(&a, &b);
    assert_eq!(combined.to_string(), "3 4 + 2 *");
    assert_eq!(combined.evaluate(&bindings(&[])).unwrap(), 14.0);
}

#[test]
fn test_combine_two_closed_expressions_is_unbalanced() {
    let a = Expression::parse("1 2 +").unwrap();
    let b = Expression::parse("3 4 +").unwrap();
    let combined = a.combine(&b);
    assert!(!combined.is_valid());
    assert_eq!(
        combined.evaluate(&bindings(&[])).unwrap_err(),
        EvalError::UnbalancedResult(2)
    );
    // Adding an operator closes it again
    let closed = combined.combine(&Expression::parse("*").unwrap());
    assert_eq!(closed.evaluate(&bindings(&[])).unwrap(), 21.0);
}

#[test]
fn test_combine_does_not_mutate_inputs() {
    let a = Expression::parse("x").unwrap().with_defaults([("x", 2.0)]);
    let b = Expression::parse("3 *").unwrap();
    let _ = a.combine(&b);
    assert_eq!(a.to_string(), "x");
    assert_eq!(b.to_string(), "3 *");
}

#[test]
fn test_pipe_is_two_step() {
    let celsius = Expression::parse("f 32 - 5 * 9 /").unwrap();
    let kelvin = Expression::parse("ans 273.15 +").unwrap();
    let pipeline = celsius.pipe(&kelvin);
    let result = pipeline.evaluate(&bindings(&[("f", 212.0)])).unwrap();
    assert!((result - 373.15).abs() < 1e-9);

    // The second stage alone has no `ans`
    assert_eq!(
        kelvin.evaluate(&bindings(&[])).unwrap_err(),
        EvalError::UnboundVariable("ans".to_string())
    );
}

#[test]
fn test_pipe_stages_are_reusable() {
    let double = Expression::parse("ans 2 *").unwrap();
    let from_five = Expression::parse("5").unwrap().pipe(&double);
    let from_x = Expression::parse("x 1 +").unwrap().pipe(&double);
    assert_eq!(from_five.evaluate(&bindings(&[])).unwrap(), 10.0);
    assert_eq!(from_x.evaluate(&bindings(&[("x", 2.0)])).unwrap(), 6.0);
    assert_eq!(from_x.second(), &double);
}

#[test]
fn test_partial_binding() {
    let area = Expression::parse("w h *").unwrap();
    let width_ten = area.partial([("w", 10.0)]);
    assert_eq!(width_ten.variables(), vec!["w", "h"]);
    assert_eq!(width_ten.evaluate(&bindings(&[("h", 3.0)])).unwrap(), 30.0);
    // Explicit bindings still override the partial default
    assert_eq!(
        width_ten
            .evaluate(&bindings(&[("w", 1.0), ("h", 3.0)]))
            .unwrap(),
        3.0
    );
    // The original is unchanged
    assert!(area.defaults().is_empty());
}

#[test]
fn test_template() {
    let tpl = Expression::template("${base} ${rate} * ${base} +").unwrap();
    assert_eq!(tpl.to_string(), "base rate * base +");
    assert_eq!(
        tpl.evaluate(&bindings(&[("base", 200.0), ("rate", 0.1)])).unwrap(),
        220.0
    );
}

#[test]
fn test_template_placeholder_shadows_constant() {
    // `pi` is a constant, but `${pi}` is always a variable
    let tpl = Expression::template("${pi} 2 *").unwrap();
    assert_eq!(tpl.evaluate(&bindings(&[("pi", 3.0)])).unwrap(), 6.0);
}
