use rpnx::display::format_number;
use rpnx::{Bindings, Config, Expression};

/// What to do with an expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Mode {
    #[default]
    Evaluate,
    Infix,
    Prefix,
    Validate,
    Json,
}

/// Execute a single line of rpnx and return the text to print
pub(crate) fn execute_line(
    input: &str,
    bindings: &Bindings,
    mode: Mode,
    config: &Config,
) -> Result<String, String> {
    match mode {
        Mode::Evaluate => {
            let expr = Expression::parse_with(input, config).map_err(|e| e.to_string())?;
            let value = expr
                .evaluate_with(bindings, config)
                .map_err(|e| e.to_string())?;
            Ok(format_number(value, config.precision))
        }
        Mode::Infix => parse(input)?.to_infix().map_err(|e| e.to_string()),
        Mode::Prefix => parse(input)?.to_prefix().map_err(|e| e.to_string()),
        Mode::Validate => match parse(input)?.validate() {
            Ok(()) => Ok("valid".to_string()),
            Err(issues) => Err(issues
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("\n       ")),
        },
        Mode::Json => {
            // Bindings given alongside --json travel as defaults
            let expr = parse(input)?.with_defaults(bindings.iter().map(|(k, v)| (k.clone(), *v)));
            expr.to_json().map_err(|e| e.to_string())
        }
    }
}

/// Tokenize without the strictness gate; conversions report their own errors
fn parse(input: &str) -> Result<Expression, String> {
    Expression::parse(input).map_err(|e| e.to_string())
}
