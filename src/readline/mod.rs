// src/readline/mod.rs
// Line sources: a reedline editor for terminals, a plain reader otherwise

use crate::completion::Completions;
use crate::error::{Result, ShellError};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal, Span, Suggestion,
};
use std::borrow::Cow;
use std::io::{BufRead, Write};

/// Lines the editor keeps for arrow-key recall. Never written to disk.
const EDITOR_HISTORY: usize = 1000;

/// Where the read-eval loop gets its input.
pub trait LineSource {
    /// Show `prompt` and block for one line. The returned line ends with its
    /// terminator whenever the input had one; `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

// ── Plain reader ──────────────────────────────────────────────────────────────

/// Reads from any buffered reader, writing the prompt to `prompt_out`.
pub struct PlainSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        PlainSource { reader, prompt_out }
    }
}

impl PlainSource<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdin() -> Self {
        PlainSource::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSource for PlainSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) => Err(ShellError::LineSource(e.to_string())),
        }
    }
}

// ── Prompt ───────────────────────────────────────────────────────────────────

struct PlainPrompt<'a> {
    text: &'a str,
}

impl Prompt for PlainPrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.text)
    }
    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let indicator = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            indicator, history_search.term
        ))
    }
}

// ── Tab completer ─────────────────────────────────────────────────────────────

struct ShellCompleter {
    completions: Completions,
}

impl Completer for ShellCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let before_cursor = &line[..pos];
        let word_start = before_cursor
            .rfind(|c: char| c == ' ' || c == '\t' || c == '|')
            .map(|i| i + 1)
            .unwrap_or(0);

        let partial = &before_cursor[word_start..];
        let is_first_word = matches!(
            before_cursor[..word_start].trim_end().chars().last(),
            None | Some('|')
        );

        self.completions
            .complete(partial, is_first_word)
            .into_iter()
            .map(|value| {
                let append_whitespace = !value.ends_with('/');
                Suggestion {
                    value,
                    description: None,
                    style: None,
                    extra: None,
                    span: Span::new(word_start, pos),
                    append_whitespace,
                }
            })
            .collect()
    }
}

// ── Editor ────────────────────────────────────────────────────────────────────

/// Interactive source backed by reedline.
///
/// Ctrl+C throws the current line away and prompts again; Ctrl+D is end of
/// input.
pub struct EditorSource {
    editor: Reedline,
}

impl EditorSource {
    pub fn new(builtins: Vec<&'static str>) -> Result<Self> {
        let history = FileBackedHistory::new(EDITOR_HISTORY)
            .map_err(|e| ShellError::LineSource(e.to_string()))?;

        let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

        let mut keybindings = reedline::default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let editor = Reedline::create()
            .with_history(Box::new(history))
            .with_completer(Box::new(ShellCompleter {
                completions: Completions::new(builtins),
            }))
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(
                    nu_ansi_term::Style::new()
                        .italic()
                        .fg(nu_ansi_term::Color::DarkGray),
                ),
            ));

        Ok(EditorSource { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let prompt = PlainPrompt { text: prompt };
        loop {
            match self.editor.read_line(&prompt) {
                Ok(Signal::Success(mut line)) => {
                    line.push('\n');
                    return Ok(Some(line));
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                }
                Ok(Signal::CtrlD) => {
                    println!("exit");
                    return Ok(None);
                }
                Err(e) => return Err(ShellError::LineSource(e.to_string())),
            }
        }
    }
}
