//! Integration tests for configuration loading and scoped overrides

#[path = "common/mod.rs"]
mod common;
use common::{assert_close, Bindings, Config, Expression};
use rpnx::config::{self, AngleUnit};
use rpnx::display::format_number;
use rpnx::{ConfigError, EvalError};
use std::fs;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rpnx.toml");
    fs::write(
        &path,
        "precision = 3\nangle_unit = \"degrees\"\nstrict = false\nmax_stack_size = 16\n",
    )
    .unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(
        config,
        Config::default()
            .with_precision(3)
            .with_angle_unit(AngleUnit::Degrees)
            .with_strict(false)
            .with_max_stack_size(16)
    );
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rpnx.toml");
    fs::write(&path, "").unwrap();
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load(&dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
    let path = dir.path().join("bad.toml");
    fs::write(&path, "angle_unit = \"gradians\"").unwrap();
    assert!(matches!(Config::load(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_precision_only_affects_display() {
    let config = Config::default().with_precision(2);
    let expr = Expression::parse("10 3 over swap / +").unwrap();
    let value = expr.evaluate_with(&Bindings::new(), &config).unwrap();
    assert_close(value, 40.0 / 3.0);
    assert_eq!(format_number(value, config.precision), "13.33");
    assert_eq!(format_number(value * 3.0, config.precision), "40");
}

#[test]
fn test_explicit_config_for_trig() {
    let degrees = Config::default().with_angle_unit(AngleUnit::Degrees);
    let expr = Expression::parse("30 sin").unwrap();
    assert_close(expr.evaluate_with(&Bindings::new(), &degrees).unwrap(), 0.5);
    assert_close(
        expr.evaluate_with(&Bindings::new(), &Config::default()).unwrap(),
        30f64.sin(),
    );
}

#[test]
fn test_scoped_override_restores() {
    let expr = Expression::parse("90 sin").unwrap();
    let before = config::current();
    let degrees = Config::default().with_angle_unit(AngleUnit::Degrees);

    let inside = config::scoped(degrees, || {
        let nested = config::scoped(Config::default(), || expr.evaluate(&Bindings::new()));
        assert_close(nested.unwrap(), 90f64.sin());
        expr.evaluate(&Bindings::new())
    });
    assert_close(inside.unwrap(), 1.0);
    assert_eq!(config::current(), before);
}

#[test]
fn test_override_restored_after_error() {
    let tiny = Config::default().with_max_stack_size(1);
    let result: Result<f64, EvalError> = {
        let _guard = config::override_with(tiny);
        Expression::parse("1 2 +").unwrap().evaluate(&Bindings::new())
    };
    assert_eq!(result, Err(EvalError::StackOverflow(1)));
    assert_eq!(config::current().max_stack_size, 1000);
}

#[test]
fn test_strict_gate() {
    let lenient = Config::default().with_strict(false);
    assert!(Expression::parse_with("1 +", &lenient).is_ok());
    assert!(Expression::parse_with("1 +", &Config::default()).is_err());
}

#[test]
fn test_threads_have_independent_config() {
    let _guard = config::override_with(Config::default().with_max_stack_size(5));
    let other = std::thread::spawn(config::current).join().unwrap();
    assert_eq!(other.max_stack_size, 1000);
    assert_eq!(config::current().max_stack_size, 5);
}
