//! Terminal helpers for the client.

use std::io::Write;

use rustyline::{
    Context, Helper, completion::Completer, highlight::Highlighter, hint::Hinter,
    validate::Validator,
};

/// Prompt shown by the line editor
pub const PROMPT: &str = "> ";

/// Print rendered output above the prompt and redisplay the prompt
pub fn print_above_prompt(output: &str) {
    // The line editor owns the current line; start from column 0.
    print!("\r{}", output);
    redisplay_prompt(PROMPT);
}

/// Redisplay the prompt after printing output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Character counter shown after the text being typed.
///
/// Only shown while the cursor is at the end of a non-empty line.
pub fn composer_hint(line: &str, pos: usize) -> Option<String> {
    if line.is_empty() || pos < line.len() {
        return None;
    }
    match line.chars().count() {
        1 => Some("  (1 char)".to_string()),
        count => Some(format!("  ({} chars)", count)),
    }
}

/// Line editor helper for the message composer
#[derive(Debug, Default)]
pub struct ComposerHelper;

impl Hinter for ComposerHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        composer_hint(line, pos)
    }
}

impl Completer for ComposerHelper {
    type Candidate = String;
}

impl Highlighter for ComposerHelper {}

impl Validator for ComposerHelper {}

impl Helper for ComposerHelper {}
