#[cfg(test)]
mod tests {
    use crate::config::{AngleUnit, Config};
    use crate::eval::*;
    use crate::lexer::lex;

    fn eval_str(input: &str) -> Result<f64, EvalError> {
        let tokens = lex(input).expect("lex failed");
        Evaluator::with_config(Config::default()).eval(&tokens, &Bindings::new(), &Defaults::new())
    }

    fn eval_vars(input: &str, vars: &[(&str, f64)]) -> Result<f64, EvalError> {
        let tokens = lex(input).expect("lex failed");
        let bindings: Bindings = vars.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Evaluator::with_config(Config::default()).eval(&tokens, &bindings, &Defaults::new())
    }

    #[test]
    fn eval_addition() {
        assert_eq!(eval_str("3 4 +").unwrap(), 7.0);
    }

    #[test]
    fn eval_operand_order() {
        assert_eq!(eval_str("10 3 -").unwrap(), 7.0);
        assert_eq!(eval_str("15 3 /").unwrap(), 5.0);
        assert_eq!(eval_str("2 3 **").unwrap(), 8.0);
    }

    #[test]
    fn eval_stack_dup() {
        assert_eq!(eval_str("5 dup *").unwrap(), 25.0);
    }

    #[test]
    fn eval_stack_swap() {
        assert_eq!(eval_str("3 4 swap -").unwrap(), 1.0);
    }

    #[test]
    fn eval_stack_rot() {
        assert_eq!(eval_str("1 2 3 rot + +").unwrap(), 6.0);
        // 1 2 3 rot -> 2 3 1
        assert_eq!(eval_str("1 2 3 rot - *").unwrap(), 4.0);
    }

    #[test]
    fn eval_stack_over() {
        // 10 3 over -> 10 3 10
        let result = eval_str("10 3 over / +").unwrap();
        assert!((result - 10.3).abs() < 1e-12);
        let result = eval_str("10 3 over swap / +").unwrap();
        assert!((result - 40.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn eval_stack_drop() {
        assert_eq!(eval_str("3 4 drop").unwrap(), 3.0);
    }

    #[test]
    fn eval_division_by_zero() {
        let err = eval_str("5 0 /").unwrap_err();
        assert_eq!(
            err,
            EvalError::DivisionByZero {
                position: 2,
                operator: "/"
            }
        );
    }

    #[test]
    fn eval_domain_errors() {
        assert!(matches!(
            eval_str("-4 sqrt").unwrap_err(),
            EvalError::DomainError { function: "sqrt", .. }
        ));
        assert!(matches!(eval_str("0 ln").unwrap_err(), EvalError::DomainError { .. }));
        assert!(matches!(eval_str("-1 log").unwrap_err(), EvalError::DomainError { .. }));
    }

    #[test]
    fn eval_underflow() {
        let err = eval_str("3 +").unwrap_err();
        assert_eq!(
            err,
            EvalError::StackUnderflow {
                position: 1,
                token: "+".to_string(),
                required: 2,
                available: 1,
            }
        );
        assert!(matches!(eval_str("1 2 rot").unwrap_err(), EvalError::StackUnderflow { .. }));
    }

    #[test]
    fn eval_unbalanced() {
        assert_eq!(eval_str("3 4 5").unwrap_err(), EvalError::UnbalancedResult(3));
        assert_eq!(eval_str("").unwrap_err(), EvalError::UnbalancedResult(0));
        assert_eq!(eval_str("3 drop").unwrap_err(), EvalError::UnbalancedResult(0));
    }

    #[test]
    fn eval_variables_and_defaults() {
        let tokens = lex("x y +").unwrap();
        let bindings: Bindings = [("y".to_string(), 4.0)].into_iter().collect();
        let defaults: Defaults = [("x".to_string(), 3.0), ("y".to_string(), 100.0)]
            .into_iter()
            .collect();
        assert_eq!(evaluate(&tokens, &bindings, &defaults).unwrap(), 7.0);
    }

    #[test]
    fn eval_unbound_variable() {
        let err = eval_vars("x y +", &[("x", 1.0)]).unwrap_err();
        assert_eq!(err, EvalError::UnboundVariable("y".to_string()));
    }

    #[test]
    fn eval_comparisons_and_logic() {
        assert_eq!(eval_str("3 4 <").unwrap(), 1.0);
        assert_eq!(eval_str("3 4 >=").unwrap(), 0.0);
        assert_eq!(eval_str("1 0 AND").unwrap(), 0.0);
        assert_eq!(eval_str("1 0 OR").unwrap(), 1.0);
        assert_eq!(eval_str("0 NOT").unwrap(), 1.0);
        assert_eq!(eval_vars("x 10 > x 20 < AND", &[("x", 15.0)]).unwrap(), 1.0);
    }

    #[test]
    fn eval_trig_respects_angle_unit() {
        let tokens = lex("90 sin").unwrap();
        let degrees = Config::default().with_angle_unit(AngleUnit::Degrees);
        let result = evaluate_with(&tokens, &Bindings::new(), &Defaults::new(), &degrees).unwrap();
        assert!((result - 1.0).abs() < 1e-12);

        let result = eval_str("0 cos").unwrap();
        assert_eq!(result, 1.0);
    }

    #[test]
    fn eval_respects_ambient_config() {
        let degrees = Config::default().with_angle_unit(AngleUnit::Degrees);
        let tokens = lex("180 cos").unwrap();
        let result = crate::config::scoped(degrees, || {
            evaluate(&tokens, &Bindings::new(), &Defaults::new())
        })
        .unwrap();
        assert!((result + 1.0).abs() < 1e-12);
    }

    #[test]
    fn eval_stack_overflow() {
        let tokens = lex("1 2 3 + +").unwrap();
        let small = Config::default().with_max_stack_size(2);
        let err = evaluate_with(&tokens, &Bindings::new(), &Defaults::new(), &small).unwrap_err();
        assert_eq!(err, EvalError::StackOverflow(2));
    }

    #[test]
    fn eval_is_deterministic() {
        let tokens = lex("x 2 ** y sqrt +").unwrap();
        let bindings: Bindings = [("x".to_string(), 3.0), ("y".to_string(), 16.0)]
            .into_iter()
            .collect();
        let first = evaluate(&tokens, &bindings, &Defaults::new());
        let second = evaluate(&tokens, &bindings, &Defaults::new());
        assert_eq!(first, second);
        assert_eq!(first.unwrap(), 13.0);
    }

    #[test]
    fn evaluator_reuse_clears_stack() {
        let mut eval = Evaluator::with_config(Config::default());
        let bad = lex("1 2").unwrap();
        assert!(eval.eval(&bad, &Bindings::new(), &Defaults::new()).is_err());
        let good = lex("2 2 *").unwrap();
        assert_eq!(eval.eval(&good, &Bindings::new(), &Defaults::new()).unwrap(), 4.0);
        assert_eq!(eval.stack(), &[4.0]);
    }
}
