// src/history.rs
use crate::error::Result;
use tracing::trace;

/// Slots added to the log each time it fills up.
pub const HISTORY_INCREMENT: usize = 64;

/// In-process log of every line read, oldest first.
///
/// Entries keep their line terminator so replay reproduces the input exactly.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `line`.
    pub fn record(&mut self, line: &str) -> Result<()> {
        if self.entries.len() == self.entries.capacity() {
            self.entries.try_reserve_exact(HISTORY_INCREMENT)?;
            trace!(capacity = self.entries.capacity(), "grew history log");
        }
        let mut entry = String::new();
        entry.try_reserve_exact(line.len())?;
        entry.push_str(line);
        self.entries.push(entry);
        Ok(())
    }

    pub fn replay(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
