//! Common test utilities for rpnx integration tests

#[allow(unused_imports)]
pub use rpnx::{
    evaluate, lex, Bindings, Config, Defaults, EvalError, Expression, ValidationIssue,
};

/// Evaluate a self-contained expression under the default config
#[allow(dead_code)]
pub fn eval(input: &str) -> Result<f64, EvalError> {
    let tokens = lex(input).expect("lex failed");
    rpnx::evaluate_with(&tokens, &Bindings::new(), &Defaults::new(), &Config::default())
}

/// Evaluate with variable bindings
#[allow(dead_code)]
pub fn eval_with(input: &str, vars: &[(&str, f64)]) -> Result<f64, EvalError> {
    let tokens = lex(input).expect("lex failed");
    rpnx::evaluate_with(&tokens, &bindings(vars), &Defaults::new(), &Config::default())
}

/// Build a bindings map from pairs
#[allow(dead_code)]
pub fn bindings(vars: &[(&str, f64)]) -> Bindings {
    vars.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Assert two floats agree to within 1e-9
#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
