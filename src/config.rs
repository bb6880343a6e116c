// src/config.rs
//
// Runtime settings. minish reads no configuration files; the few knobs it has
// come from the environment.

use std::io::IsTerminal;

/// Filter used when neither `MINISH_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Use the line editor rather than a plain line reader.
    pub interactive: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(
            |key| std::env::var(key).ok(),
            std::io::stdin().is_terminal(),
        )
    }

    /// Build from an arbitrary variable lookup; `stdin_is_tty` is what the
    /// terminal check reported.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>, stdin_is_tty: bool) -> Self {
        let log_filter = var("MINISH_LOG")
            .or_else(|| var("RUST_LOG"))
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let force_plain = var("MINISH_PLAIN")
            .map(|v| !v.is_empty() && v != "0")
            .unwrap_or(false);

        Config {
            log_filter,
            interactive: stdin_is_tty && !force_plain,
        }
    }
}
