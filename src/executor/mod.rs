// src/executor/mod.rs - dispatcher and process launcher
pub mod builtin;
pub mod pipeline;
pub mod reaper;

use crate::error::Result;
use crate::parser::Tokens;
use crate::shell::Shell;
use builtin::BuiltinContext;
use libc::pid_t;
use std::io::{self, Write};
use std::process::{Command as Proc, Stdio};
use tracing::{debug, trace};

/// Whether the read-eval loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Run one tokenized line: a builtin if the first word names one, otherwise
/// an external program. Only builtins can return [`Flow::Stop`].
pub fn execute(shell: &mut Shell, tokens: &Tokens<'_>) -> Result<Flow> {
    let Some(name) = tokens.first() else {
        return Ok(Flow::Continue);
    };

    if let Some(builtin) = shell.builtins.lookup(name) {
        debug!(name, "running builtin");
        let names = shell.builtins.names();
        let mut ctx = BuiltinContext {
            out: &mut shell.out,
            err: &mut shell.err,
            history: &shell.history,
            builtins: &names,
        };
        let flow = builtin.run(tokens.words(), &mut ctx)?;
        shell.out.flush()?;
        return Ok(flow);
    }

    launch(shell, tokens)?;
    Ok(Flow::Continue)
}

/// Start the external program(s) named by `tokens`.
fn launch(shell: &mut Shell, tokens: &Tokens<'_>) -> Result<()> {
    // Children must not inherit the line editor's raw mode.
    crossterm::terminal::disable_raw_mode().ok();
    shell.out.flush()?;

    match tokens.split_pipe() {
        Some((left, right)) => pipeline::run_pipeline(shell, left, right),
        None => run_external(shell, tokens.words(), tokens.background()),
    }
}

fn run_external(shell: &mut Shell, argv: &[&str], background: bool) -> Result<()> {
    let child = match build_command(argv).spawn() {
        Ok(child) => child,
        Err(e) => return report_spawn_error(shell, argv[0], &e),
    };
    let pid = child.id() as pid_t;
    debug!(pid, program = argv[0], background, "spawned");

    if background {
        // Adopt before printing so a failed write cannot leak the child.
        shell.reaper.adopt(pid);
        writeln!(shell.out, "Child PID is {pid}")?;
        shell.out.flush()?;
    } else {
        wait_foreground(pid)?;
    }
    Ok(())
}

/// `argv[0]` is resolved against PATH; the rest are passed through untouched.
pub(crate) fn build_command(argv: &[&str]) -> Proc {
    let mut cmd = Proc::new(argv[0]);
    cmd.args(&argv[1..]);
    cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());
    cmd
}

/// Block until `pid` exits or is killed by a signal. Stops are not terminal:
/// a suspended child is waited on again.
pub(crate) fn wait_foreground(pid: pid_t) -> Result<()> {
    loop {
        let mut status = 0;
        if unsafe { libc::waitpid(pid, &mut status, libc::WUNTRACED) } == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            // ECHILD would mean the pid escaped us; nothing left to wait for.
            debug!(pid, error = %err, "waitpid failed");
            return Ok(());
        }

        if libc::WIFEXITED(status) {
            debug!(pid, code = libc::WEXITSTATUS(status), "child exited");
            return Ok(());
        }
        if libc::WIFSIGNALED(status) {
            debug!(pid, signal = libc::WTERMSIG(status), "child killed");
            return Ok(());
        }
        trace!(pid, "child stopped");
    }
}

pub(crate) fn report_spawn_error(shell: &mut Shell, program: &str, e: &io::Error) -> Result<()> {
    debug!(program, error = %e, "spawn failed");
    writeln!(shell.err, "minish: {program}: {e}")?;
    Ok(())
}
