// src/executor/builtin/core.rs
use super::{Builtin, BuiltinContext};
use crate::error::Result;
use crate::executor::Flow;
use tracing::debug;

pub struct Cd;

impl Builtin for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, args: &[&str], ctx: &mut BuiltinContext<'_>) -> Result<Flow> {
        let Some(path) = args.get(1) else {
            writeln!(ctx.err, "minish: expected argument to \"cd\"")?;
            return Ok(Flow::Continue);
        };

        if let Err(e) = std::env::set_current_dir(path) {
            debug!(path = *path, error = %e, "cd failed");
            writeln!(ctx.err, "minish: cd: {path}: {e}")?;
        }
        Ok(Flow::Continue)
    }
}

pub struct Help;

impl Builtin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn run(&self, _args: &[&str], ctx: &mut BuiltinContext<'_>) -> Result<Flow> {
        writeln!(ctx.out, "minish: a minimal command interpreter")?;
        writeln!(ctx.out, "Type program names and arguments, and hit enter.")?;
        writeln!(ctx.out, "The following functions are built in:")?;
        for name in ctx.builtins {
            writeln!(ctx.out, "  {name}")?;
        }
        writeln!(ctx.out, "Use the man command for information on other programs.")?;
        Ok(Flow::Continue)
    }
}

pub struct Exit;

impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(&self, _args: &[&str], _ctx: &mut BuiltinContext<'_>) -> Result<Flow> {
        Ok(Flow::Stop)
    }
}

/// `history`: replays the log verbatim, each entry with its own terminator.
pub struct HistoryCmd;

impl Builtin for HistoryCmd {
    fn name(&self) -> &'static str {
        "history"
    }

    fn run(&self, _args: &[&str], ctx: &mut BuiltinContext<'_>) -> Result<Flow> {
        for line in ctx.history.replay() {
            ctx.out.write_all(line.as_bytes())?;
        }
        Ok(Flow::Continue)
    }
}
