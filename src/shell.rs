// src/shell.rs
use crate::error::Result;
use crate::executor::builtin::BuiltinRegistry;
use crate::executor::reaper::Reaper;
use crate::executor::{self, Flow};
use crate::history::History;
use crate::parser;
use crate::readline::LineSource;
use std::io::Write;
use tracing::debug;

/// Printed before every read.
pub const PROMPT: &str = "> ";

/// Engine state for one interactive session.
///
/// Owns everything the loop touches: the history log, the builtin table, the
/// reaper for background children and the two output streams.
pub struct Shell {
    pub(crate) history: History,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) reaper: Reaper,
    pub(crate) out: Box<dyn Write>,
    pub(crate) err: Box<dyn Write>,
}

impl Shell {
    /// A shell with the default builtins, printing to the process's stdout
    /// and stderr.
    pub fn new() -> Result<Self> {
        Self::with_io(
            BuiltinRegistry::with_defaults(),
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
        )
    }

    pub fn with_io(
        builtins: BuiltinRegistry,
        out: Box<dyn Write>,
        err: Box<dyn Write>,
    ) -> Result<Self> {
        Ok(Shell {
            history: History::new(),
            builtins,
            reaper: Reaper::spawn()?,
            out,
            err,
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    /// One loop iteration after the read: record, tokenize, dispatch.
    pub fn eval_line(&mut self, line: &str) -> Result<Flow> {
        self.history.record(line)?;
        let tokens = parser::tokenize(line)?;
        executor::execute(self, &tokens)
    }

    /// Read-eval loop. Returns once a builtin asks to stop or the source runs
    /// dry; an `Err` is always fatal.
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        loop {
            let Some(line) = source.read_line(PROMPT)? else {
                debug!("end of input");
                return Ok(());
            };

            match self.eval_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => {
                    debug!("stop requested");
                    return Ok(());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    writeln!(self.err, "minish: {e}").ok();
                }
            }
        }
    }
}
