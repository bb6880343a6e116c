// src/parser/mod.rs
//
// Line tokenizer. Splits on the delimiter class, never on quotes: minish has
// no quoting, so a word is simply a maximal run of non-delimiter characters.

use crate::error::Result;
use tracing::trace;

/// Initial token capacity, and the step the buffer grows by when full.
pub const TOKEN_BUFSIZE: usize = 64;

/// Characters that separate words: space, tab, CR, LF and BEL.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Trailing token that asks for background execution.
pub const BACKGROUND_MARKER: &str = "&";

/// Token that splits a line into two pipeline stages.
pub const PIPE_MARKER: &str = "|";

/// The words of one input line, borrowed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    words: Vec<&'a str>,
    background: bool,
}

impl<'a> Tokens<'a> {
    pub fn words(&self) -> &[&'a str] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when the line ended with a lone `&`.
    pub fn background(&self) -> bool {
        self.background
    }

    pub fn first(&self) -> Option<&'a str> {
        self.words.first().copied()
    }

    /// Split at the first `|`. Any later marker stays a literal word of the
    /// right-hand side.
    pub fn split_pipe(&self) -> Option<(&[&'a str], &[&'a str])> {
        let at = self.words.iter().position(|w| *w == PIPE_MARKER)?;
        Some((&self.words[..at], &self.words[at + 1..]))
    }
}

/// Tokenize a raw input line.
///
/// The token buffer starts at [`TOKEN_BUFSIZE`] slots and grows by the same
/// amount each time it fills. A failed reservation is reported as
/// [`ShellError::Allocation`](crate::error::ShellError::Allocation).
pub fn tokenize(line: &str) -> Result<Tokens<'_>> {
    let mut words: Vec<&str> = Vec::new();
    words.try_reserve_exact(TOKEN_BUFSIZE)?;

    for word in line.split(is_delimiter).filter(|w| !w.is_empty()) {
        if words.len() == words.capacity() {
            words.try_reserve_exact(TOKEN_BUFSIZE)?;
            trace!(capacity = words.capacity(), "grew token buffer");
        }
        words.push(word);
    }

    let background = words.last() == Some(&BACKGROUND_MARKER);
    if background {
        words.pop();
    }

    Ok(Tokens { words, background })
}

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}
