//! A tiny interactive command interpreter.
//!
//! The shell reads one line at a time, splits it into whitespace-delimited
//! tokens, and either runs a builtin (`exit`, `cd`, `history`) in-process or
//! launches the tokens as a chain of external programs connected by
//! anonymous pipes, waiting for the whole chain before prompting again.
//! There is deliberately no quoting, redirection, globbing, job control, or
//! `PATH` search — programs are named by path.
//!
//! The main entry point is [`Shell`], which owns the bounded command
//! [`history`] buffer and drives the [`executor`] over plans produced by the
//! [`parser`]. Process creation sits behind [`executor::Launcher`], so the
//! execution loop can be tested without spawning anything.

mod builtin;
pub mod executor;
pub mod history;
pub mod lexer;
pub mod parser;

mod interpreter;

pub use interpreter::{ControlFlow, Shell};
