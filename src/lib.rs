//! minish: a minimal interactive command interpreter.
//!
//! The engine reads a line, splits it on whitespace, and either runs one of
//! its builtins (`cd`, `help`, `exit`, `history`) or starts an external
//! program. A trailing `&` runs the program in the background, and a single
//! `|` connects two programs with a pipe. Background children are reclaimed
//! by a [`Reaper`](executor::reaper::Reaper) thread driven by `SIGCHLD`.
//!
//! [`Shell`] owns all engine state; [`Shell::run`] is the read-eval loop and
//! [`Shell::eval_line`] a single iteration of it.

pub mod completion;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod io_adapters;
pub mod parser;
pub mod readline;
pub mod shell;

pub use config::Config;
pub use error::{Result, ShellError};
pub use executor::Flow;
pub use shell::Shell;
