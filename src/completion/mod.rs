// src/completion/mod.rs
// Tab completion engine - completes builtin names, PATH commands and file paths

use std::path::{Path, PathBuf};

pub struct Completions {
    builtins: Vec<&'static str>,
}

impl Completions {
    pub fn new(builtins: Vec<&'static str>) -> Self {
        Completions { builtins }
    }

    /// Candidates for `partial`. The first word of a command completes to
    /// builtins and PATH executables, every other word to file paths.
    pub fn complete(&self, partial: &str, is_first_word: bool) -> Vec<String> {
        if partial.is_empty() {
            return vec![];
        }

        let looks_like_path =
            partial.contains('/') || partial.starts_with('.') || partial.starts_with('~');

        if looks_like_path || !is_first_word {
            return complete_path(partial);
        }

        let mut results: Vec<String> = self
            .builtins
            .iter()
            .filter(|name| name.starts_with(partial))
            .map(|name| name.to_string())
            .collect();
        for cmd in complete_commands(partial) {
            if !results.contains(&cmd) {
                results.push(cmd);
            }
        }
        results
    }
}

/// Complete file and directory names. Directories get a trailing `/`.
pub fn complete_path(partial: &str) -> Vec<String> {
    let home = dirs::home_dir().map(|h| h.display().to_string());
    let expanded = match (&home, partial.strip_prefix("~/")) {
        (Some(home), Some(rest)) => format!("{home}/{rest}"),
        _ => partial.to_string(),
    };

    let (dir, prefix) = match expanded.rfind('/') {
        Some(i) => (PathBuf::from(&expanded[..=i]), expanded[i + 1..].to_string()),
        None => (PathBuf::from("."), expanded.clone()),
    };

    let Ok(read_dir) = std::fs::read_dir(&dir) else {
        return vec![];
    };

    let mut matches = Vec::new();
    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(&prefix) {
            continue;
        }
        let trail = if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) { "/" } else { "" };

        // Keep whatever directory part the user typed, `~` included
        let typed_dir = &partial[..partial.len() - prefix.len()];
        matches.push(format!("{typed_dir}{name}{trail}"));
    }

    matches.sort();
    matches
}

/// Complete command names from PATH
pub fn complete_commands(partial: &str) -> Vec<String> {
    let path_var = std::env::var("PATH").unwrap_or_default();
    let mut commands = Vec::new();

    for dir in path_var.split(':') {
        let Ok(entries) = std::fs::read_dir(dir) else { continue };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(partial) && is_executable(&entry.path()) {
                commands.push(name);
            }
        }
    }

    commands.sort();
    commands.dedup();
    commands
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
