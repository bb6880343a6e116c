// src/executor/pipeline.rs
//
// Two-stage pipeline: left stdout feeds right stdin through one OS pipe.

use super::{build_command, report_spawn_error, wait_foreground};
use crate::error::Result;
use crate::shell::Shell;
use libc::pid_t;
use std::io::Write;
use std::process::Stdio;
use tracing::debug;

/// Run `left | right` and return once every spawned stage has terminated.
///
/// The parent holds no pipe end once both stages are spawned: the write end
/// only ever exists in the left child, and the read end is moved into the
/// right child's command, which is dropped right after spawning.
pub fn run_pipeline(shell: &mut Shell, left: &[&str], right: &[&str]) -> Result<()> {
    if left.is_empty() || right.is_empty() {
        writeln!(shell.err, "minish: syntax error near unexpected token '|'")?;
        return Ok(());
    }

    let mut left_cmd = build_command(left);
    left_cmd.stdout(Stdio::piped());
    let mut left_child = match left_cmd.spawn() {
        Ok(child) => child,
        Err(e) => return report_spawn_error(shell, left[0], &e),
    };
    drop(left_cmd);

    let mut pids = vec![left_child.id() as pid_t];
    let mut reported = Ok(());

    if let Some(read_end) = left_child.stdout.take() {
        let mut right_cmd = build_command(right);
        right_cmd.stdin(Stdio::from(read_end));
        match right_cmd.spawn() {
            Ok(child) => pids.push(child.id() as pid_t),
            Err(e) => reported = report_spawn_error(shell, right[0], &e),
        }
    }
    debug!(?pids, "pipeline spawned");

    // Only our own stages: a blanket wait(-1) would also swallow background
    // children adopted by the reaper, and block on them while they run.
    for pid in pids {
        wait_foreground(pid)?;
    }
    reported
}
