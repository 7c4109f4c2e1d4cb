use crate::cli::VERSION;
use rpnx::display::format_number;
use rpnx::expr::ANSWER;
use rpnx::{lexer, registry, Bindings, Config, Expression, Token};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper, Result as RlResult};
use std::borrow::Cow;

const REPL_COMMANDS: &[&str] = &["help", "vars", "clear", "exit", "quit"];

const REPL_HELP: &str = "\
Enter a postfix expression to evaluate it, e.g. `3 4 + 2 *`.

COMMANDS:
    name = <expr>           Evaluate and store in a variable
    ans                     The last result
    vars                    List variables
    clear                   Forget all variables
    help                    Show this help
    exit, quit              Leave the REPL (Ctrl-D also works)";

/// What the loop should do after a line
#[derive(Debug, PartialEq)]
pub(crate) enum Outcome {
    Print(String),
    Silent,
    Exit,
}

/// Variables and settings that persist between REPL lines
pub(crate) struct Session {
    variables: Bindings,
    config: Config,
}

impl Session {
    pub(crate) fn new(config: Config, variables: Bindings) -> Self {
        Session { variables, config }
    }

    pub(crate) fn variables(&self) -> &Bindings {
        &self.variables
    }

    fn evaluate(&self, source: &str) -> Result<f64, String> {
        let expr = Expression::parse_with(source, &self.config).map_err(|e| e.to_string())?;
        expr.evaluate_with(&self.variables, &self.config)
            .map_err(|e| e.to_string())
    }

    /// Split `name = <expr>`; `==` never counts as assignment
    fn assignment(line: &str) -> Option<(&str, &str)> {
        let (name, rest) = line.split_once('=')?;
        if rest.starts_with('=') {
            return None;
        }
        let name = name.trim();
        match lexer::lex_atom(name) {
            Ok(Token::Variable(var)) if var == name => Some((name, rest.trim())),
            _ if registry::is_reserved(name) => Some((name, rest.trim())),
            _ => None,
        }
    }

    /// Handle one line of input
    pub(crate) fn handle_line(&mut self, line: &str) -> Result<Outcome, String> {
        let line = line.trim();
        match line {
            "" => return Ok(Outcome::Silent),
            "exit" | "quit" => return Ok(Outcome::Exit),
            "help" => return Ok(Outcome::Print(REPL_HELP.to_string())),
            "vars" => return Ok(Outcome::Print(self.list_variables())),
            "clear" => {
                self.variables.clear();
                return Ok(Outcome::Silent);
            }
            _ => {}
        }

        if let Some((name, source)) = Self::assignment(line) {
            if registry::is_reserved(name) {
                return Err(format!("Cannot assign to reserved word '{}'", name));
            }
            let value = self.evaluate(source)?;
            self.variables.insert(name.to_string(), value);
            self.variables.insert(ANSWER.to_string(), value);
            return Ok(Outcome::Print(format!(
                "{} = {}",
                name,
                format_number(value, self.config.precision)
            )));
        }

        let value = self.evaluate(line)?;
        self.variables.insert(ANSWER.to_string(), value);
        Ok(Outcome::Print(format_number(value, self.config.precision)))
    }

    fn list_variables(&self) -> String {
        if self.variables.is_empty() {
            return "(no variables)".to_string();
        }
        let mut names: Vec<&String> = self.variables.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                format!(
                    "{} = {}",
                    name,
                    format_number(self.variables[name], self.config.precision)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Helper struct for rustyline with tab completion and a live result hint
struct RpnxHelper {
    words: Vec<&'static str>,
    variables: Bindings,
    config: Config,
}

impl Helper for RpnxHelper {}

impl Completer for RpnxHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Find the word being completed
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = &line[start..pos];

        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }

        let mut completions: Vec<String> = self
            .words
            .iter()
            .chain(REPL_COMMANDS.iter())
            .filter(|w| w.starts_with(prefix))
            .map(|w| w.to_string())
            .collect();
        completions.extend(
            self.variables
                .keys()
                .filter(|name| name.starts_with(prefix))
                .cloned(),
        );
        completions.sort();
        completions.dedup();

        let pairs = completions
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();

        Ok((start, pairs))
    }
}

impl Hinter for RpnxHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        // Preview the result once the line is complete enough to evaluate
        if pos < line.len() || line.trim().is_empty() {
            return None;
        }
        let expr = Expression::parse(line).ok()?;
        if !expr.is_valid() {
            return None;
        }
        let value = expr.evaluate_with(&self.variables, &self.config).ok()?;
        Some(format!("  = {}", format_number(value, self.config.precision)))
    }
}

impl Highlighter for RpnxHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize) -> bool {
        false
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim the result preview
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }
}

impl Validator for RpnxHelper {}

// ============================================
// REPL main loop
// ============================================

pub(crate) fn run_repl(config: Config, variables: Bindings) -> RlResult<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(RpnxHelper {
        words: registry::all_words(),
        variables: Bindings::new(),
        config,
    }));

    let mut session = Session::new(config, variables);
    let prompt = format!("rpnx-{}> ", VERSION);

    loop {
        // Keep completion and hints in step with the session's variables
        if let Some(helper) = rl.helper_mut() {
            helper.variables = session.variables().clone();
        }

        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match session.handle_line(&line) {
                    Ok(Outcome::Print(text)) => println!("{}", text),
                    Ok(Outcome::Silent) => {}
                    Ok(Outcome::Exit) => break,
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C abandons the current line
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
