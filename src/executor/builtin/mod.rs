// src/executor/builtin/mod.rs
mod core;

pub use self::core::{Cd, Exit, Help, HistoryCmd};

use crate::error::{Result, ShellError};
use crate::executor::Flow;
use crate::history::History;
use std::io::Write;

/// What a builtin may touch while it runs.
pub struct BuiltinContext<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub history: &'a History,
    /// Names of every registered builtin, in registration order.
    pub builtins: &'a [&'static str],
}

/// A command implemented inside the shell process.
pub trait Builtin {
    /// Name the dispatcher matches against the first token.
    fn name(&self) -> &'static str;

    /// Run with the full token sequence, `args[0]` being the name itself.
    ///
    /// Usage and OS errors go to `ctx.err`; an `Err` return is reserved for
    /// failures of the output streams themselves.
    fn run(&self, args: &[&str], ctx: &mut BuiltinContext<'_>) -> Result<Flow>;
}

/// Ordered table of builtins, fixed once the shell is built.
pub struct BuiltinRegistry {
    builtins: Vec<Box<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self { builtins: Vec::new() }
    }

    /// The table every shell starts with: `cd`, `help`, `exit`, `history`.
    pub fn with_defaults() -> Self {
        Self {
            builtins: vec![
                Box::new(Cd),
                Box::new(Help),
                Box::new(Exit),
                Box::new(HistoryCmd),
            ],
        }
    }

    /// Add a builtin at the end of the table. Names must be unique.
    pub fn register(&mut self, builtin: Box<dyn Builtin>) -> Result<()> {
        if self.lookup(builtin.name()).is_some() {
            return Err(ShellError::DuplicateBuiltin(builtin.name().to_string()));
        }
        self.builtins.push(builtin);
        Ok(())
    }

    /// First builtin whose name equals `name` exactly.
    pub fn lookup(&self, name: &str) -> Option<&dyn Builtin> {
        self.builtins
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.builtins.iter().map(|b| b.name()).collect()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
