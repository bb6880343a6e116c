// src/executor/reaper.rs
//
// Reclaims background children. A dedicated thread wakes on SIGCHLD and
// polls every adopted pid without blocking. Only adopted pids are ever
// waited on, so the launcher's own blocking waits are never disturbed.

use crate::error::Result;
use libc::pid_t;
use signal_hook::consts::SIGCHLD;
use signal_hook::iterator::{Handle, Signals};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

pub struct Reaper {
    pending: Arc<Mutex<HashSet<pid_t>>>,
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Reaper {
    /// Install the SIGCHLD listener and start the reaper thread.
    pub fn spawn() -> Result<Self> {
        let mut signals = Signals::new([SIGCHLD])?;
        let handle = signals.handle();
        let pending = Arc::new(Mutex::new(HashSet::new()));

        let shared = Arc::clone(&pending);
        let thread = thread::Builder::new()
            .name("minish-reaper".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    sweep(&shared);
                }
                trace!("reaper thread exiting");
            })?;

        Ok(Self { pending, handle, thread: Some(thread) })
    }

    /// Take over the wait obligation for a background child.
    ///
    /// Sweeps once right away: the child may have exited, and its SIGCHLD
    /// been consumed, before it was adopted.
    pub fn adopt(&self, pid: pid_t) {
        debug!(pid, "adopting background child");
        lock(&self.pending).insert(pid);
        sweep(&self.pending);
    }

    /// Adopted children not yet reclaimed.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("reaper thread panicked");
            }
        }
    }
}

fn lock(pending: &Mutex<HashSet<pid_t>>) -> std::sync::MutexGuard<'_, HashSet<pid_t>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reclaim every adopted child that has already terminated.
fn sweep(pending: &Mutex<HashSet<pid_t>>) {
    let mut pending = lock(pending);
    pending.retain(|&pid| {
        let mut status = 0;
        match unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) } {
            0 => true,
            -1 => {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EINTR) {
                    return true;
                }
                // ECHILD: somebody else reclaimed it, or it was never ours
                debug!(pid, error = %err, "dropping unwaitable pid");
                false
            }
            _ => {
                debug!(pid, "reaped background child");
                false
            }
        }
    });
}
