//! The interactive loop and the per-line dispatcher.

use crate::builtin::{self, Cd, Hist};
use crate::executor::{self, Launcher, OsLauncher};
use crate::history::History;
use crate::lexer;
use crate::parser;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, IsTerminal};

const PROMPT: &str = "$ ";

/// Name that terminates the interactive loop.
const EXIT: &str = "exit";

/// Outcome of dispatching one raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep prompting.
    Continue,
    /// Stop the loop; the shell exits with status 0.
    Exit,
}

/// A minimal interactive command interpreter.
///
/// One line at a time: tokenize, classify the first token as a builtin
/// (`exit`, `cd`, `history`) or an external pipeline, run it to completion,
/// prompt again. Execution is fully synchronous — the loop never overlaps
/// two pipelines, and a hung child blocks it indefinitely.
///
/// The launcher is a type parameter so tests can audit dispatching with a
/// recording fake; [`Shell::new`] wires in the real [`OsLauncher`].
pub struct Shell<L: Launcher = OsLauncher> {
    history: History,
    launcher: L,
}

impl Shell<OsLauncher> {
    pub fn new() -> Self {
        Self::with_launcher(OsLauncher::new())
    }

    /// Reads and dispatches lines until `exit` or end of input.
    ///
    /// On a terminal this is a rustyline-backed prompt loop; otherwise
    /// (input piped in, as in scripts and the end-to-end tests) lines are
    /// read plainly with no prompt.
    pub fn repl(&mut self) -> Result<()> {
        if std::io::stdin().is_terminal() {
            self.repl_interactive()
        } else {
            self.repl_piped()
        }
    }

    fn repl_interactive(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    // Line-editing recall is separate from the shell's own
                    // history buffer and records everything typed.
                    editor.add_history_entry(line.as_str())?;
                    if self.dispatch(&line) == ControlFlow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("error: {err}");
                    break;
                }
            }
        }
        Ok(())
    }

    fn repl_piped(&mut self) -> Result<()> {
        for line in std::io::stdin().lock().lines() {
            if self.dispatch(&line?) == ControlFlow::Exit {
                break;
            }
        }
        Ok(())
    }
}

impl Default for Shell<OsLauncher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Launcher> Shell<L> {
    pub fn with_launcher(launcher: L) -> Self {
        Self {
            history: History::new(),
            launcher,
        }
    }

    /// The recorded command history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Classifies and runs one raw input line.
    pub fn dispatch(&mut self, line: &str) -> ControlFlow {
        let tokens = lexer::tokenize(line);
        if tokens.is_empty() {
            return ControlFlow::Continue;
        }

        // A bare `history` invocation is never recorded, so listing can't
        // list itself and a replayed entry can't recurse into the builtin.
        // `history` piped into something is an ordinary external command.
        if tokens[0] == Hist::NAME && !parser::contains_pipe(&tokens) {
            self.run_history(&tokens[1..]);
            return ControlFlow::Continue;
        }

        self.history.record(line);
        self.run_command(&tokens)
    }

    /// Runs an already-recorded (or replayed) command line.
    fn run_command(&mut self, tokens: &[String]) -> ControlFlow {
        match tokens[0].as_str() {
            EXIT => ControlFlow::Exit,
            Cd::NAME => {
                match builtin::parse_args::<Cd>(Cd::NAME, &tokens[1..]) {
                    Ok(cd) => {
                        if let Err(err) = cd.execute() {
                            println!("error: {err}");
                        }
                    }
                    Err(early_exit) => print!("{}", early_exit.output),
                }
                ControlFlow::Continue
            }
            _ => {
                let pipeline = parser::plan(tokens.to_vec());
                // The pipeline's own exit status is discarded; only launch
                // and reap failures are worth reporting.
                if let Err(err) = executor::execute(&mut self.launcher, &pipeline) {
                    println!("error: {err}");
                }
                ControlFlow::Continue
            }
        }
    }

    /// The `history` builtin: list, clear, or replay by index.
    fn run_history(&mut self, args: &[String]) {
        let hist: Hist = match builtin::parse_args(Hist::NAME, args) {
            Ok(hist) => hist,
            Err(early_exit) => {
                print!("{}", early_exit.output);
                return;
            }
        };

        if hist.clear {
            self.history.clear();
            return;
        }

        let Some(argument) = hist.entry else {
            for (index, raw) in self.history.iter() {
                println!("{index} {raw}");
            }
            return;
        };

        let Ok(index) = argument.parse::<usize>() else {
            println!("error: invalid argument to history");
            return;
        };

        let raw = match self.history.recall(index) {
            Ok(raw) => raw.to_owned(),
            Err(err) => {
                println!("error: {err}");
                return;
            }
        };

        let tokens = lexer::tokenize(&raw);
        if !tokens.is_empty() {
            // The replayed command's outcome is discarded, so a replayed
            // `exit` does not terminate the loop.
            self.run_command(&tokens);
        }
    }
}
