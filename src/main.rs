//! rpnx - Reverse Polish Notation calculator
//!
//! Usage:
//!   rpnx                  Start interactive REPL
//!   rpnx "3 4 +"          Evaluate an expression
//!   rpnx "3 4 +" --infix  Convert to infix

mod cli;
mod rcfile;
mod repl;
mod terminal;

use cli::{parse_args, print_help, print_version, run_expression};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    rpnx::init_tracing(cli.trace);

    // ~/.rpnxrc.toml first, command-line flags override it
    let config = cli.apply_to(rcfile::load_rpnxrc());
    rpnx::config::set_defaults(config);

    match cli.expression.as_deref() {
        Some(expression) if !cli.repl => run_expression(expression, &cli, &config),
        _ => match repl::run_repl(config, cli.bindings()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("REPL error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
