use crate::terminal::{execute_line, Mode};
use rpnx::{AngleUnit, Bindings, Config};
use std::process::ExitCode;

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliArgs {
    pub(crate) expression: Option<String>,
    pub(crate) vars: Vec<(String, f64)>,
    pub(crate) mode: Mode,
    pub(crate) precision: Option<usize>,
    pub(crate) degrees: bool,
    pub(crate) repl: bool,
    pub(crate) trace: bool,
    pub(crate) help: bool,
    pub(crate) version: bool,
}

impl CliArgs {
    /// Layer command-line settings over a loaded config
    pub(crate) fn apply_to(&self, mut config: Config) -> Config {
        if let Some(places) = self.precision {
            config = config.with_precision(places);
        }
        if self.degrees {
            config = config.with_angle_unit(AngleUnit::Degrees);
        }
        config
    }

    pub(crate) fn bindings(&self) -> Bindings {
        self.vars.iter().cloned().collect()
    }
}

/// Parse `name=value`
fn parse_var(spec: &str) -> Result<(String, f64), String> {
    let (name, value) = spec
        .split_once('=')
        .ok_or_else(|| format!("--var expects name=value, got '{}'", spec))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("--var expects name=value, got '{}'", spec));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("--var {}: '{}' is not a number", name, value.trim()))?;
    Ok((name.to_string(), value))
}

/// Take the value following a flag
fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--var" | "-v" => {
                let spec = flag_value(args, &mut i, "--var")?;
                cli.vars.push(parse_var(spec)?);
            }
            "--infix" => cli.mode = Mode::Infix,
            "--prefix" => cli.mode = Mode::Prefix,
            "--validate" => cli.mode = Mode::Validate,
            "--json" => cli.mode = Mode::Json,
            "--precision" | "-p" => {
                let value = flag_value(args, &mut i, "--precision")?;
                let places = value
                    .parse()
                    .map_err(|_| format!("--precision expects a whole number, got '{}'", value))?;
                cli.precision = Some(places);
            }
            "--degrees" => cli.degrees = true,
            "--repl" => cli.repl = true,
            "--trace" => cli.trace = true,
            "--help" | "-h" => cli.help = true,
            "--version" | "-V" => cli.version = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option: {}", flag));
            }
            expression => {
                // Negative literals such as "-5 abs" are expressions, not flags
                match cli.expression.as_mut() {
                    Some(existing) => {
                        existing.push(' ');
                        existing.push_str(expression);
                    }
                    None => cli.expression = Some(expression.to_string()),
                }
            }
        }
        i += 1;
    }

    Ok(cli)
}

/// Run a single expression from the command line
pub(crate) fn run_expression(expression: &str, cli: &CliArgs, config: &Config) -> ExitCode {
    match execute_line(expression, &cli.bindings(), cli.mode, config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn print_help() {
    println!(
        r#"rpnx-{} Reverse Polish Notation calculator

USAGE:
    rpnx "<expression>" [OPTIONS]   Evaluate an expression
    rpnx                           Start interactive REPL
    rpnx --repl                    Start interactive REPL

OPTIONS:
    -v, --var name=value    Bind a variable (repeatable)
    --infix                 Print the expression in infix notation
    --prefix                Print the expression in prefix notation
    --validate              Check stack balance without evaluating
    --json                  Print the expression as JSON
    -p, --precision N       Round displayed results to N decimal places
    --degrees               Use degrees for sin, cos and tan
    --trace                 Show evaluation trace on stderr
    -h, --help              Show this help message
    -V, --version           Show version

CONFIG:
    ~/.rpnxrc.toml          precision, angle_unit, strict, max_stack_size

SYNTAX:
    3.5 -2 1e-3             Numbers push themselves
    x ${{x}}                  Variables resolve from --var bindings
    pi e tau inf            Constants
    + - * / // % ** pow     Arithmetic (operand pushed first is on the left)
    == != < > <= >=         Comparisons (1 or 0)
    AND OR NOT              Logic on truthiness
    sqrt abs neg ln exp log sin cos tan ceil floor round max min

STACK OPS:
    dup                     a -> a a
    swap                    a b -> b a
    drop                    a b -> a
    over                    a b -> a b a
    rot                     a b c -> b c a

EXAMPLES:
    rpnx "3 4 + 2 *"                    # 14
    rpnx "x 2 **" --var x=9             # 81
    rpnx "3 4 + 2 *" --infix            # ((3 + 4) * 2)
    rpnx "10 3 /" --precision 2         # 3.33
"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("rpnx {}", VERSION);
}
