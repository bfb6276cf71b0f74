use std::thread;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use crate::document::Document;
use crate::interval::delay_for_char;
use crate::session::{CancelToken, TypingConfig};
use crate::trace::{escape_for_log, print_trace_line};

/// Coarse classification of the target document's syntax, detected once at
/// session start. Selects the line correction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageMode {
    #[default]
    Plain,
    JavaScript,
}

impl LanguageMode {
    /// Classify a document's grammar/language name.
    pub fn detect(language_name: &str) -> Self {
        if language_name.eq_ignore_ascii_case("javascript") {
            LanguageMode::JavaScript
        } else {
            LanguageMode::Plain
        }
    }

    pub fn correction(self) -> LineCorrection {
        match self {
            LanguageMode::Plain => LineCorrection::None,
            LanguageMode::JavaScript => LineCorrection::BracketAwareJavaScript,
        }
    }
}

/// What to do about host-editor assistance before typing each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCorrection {
    /// Type every line verbatim.
    #[default]
    None,

    /// Before typing a line, check whether the host's auto-bracket-closing
    /// already populated the line below the cursor with it; if so, adopt
    /// that line instead of retyping it and repair its tail.
    BracketAwareJavaScript,
}

/// Type one source line at the cursor.
///
/// Inserts a line break first for every line except the first, so the lines
/// land in the document exactly as they appear in the source.
pub fn type_line(
    doc: &mut dyn Document,
    line: &str,
    index: usize,
    correction: LineCorrection,
    cancel: &CancelToken,
    cfg: &TypingConfig,
    rng: &mut impl Rng,
) -> Result<()> {
    if correction == LineCorrection::BracketAwareJavaScript && auto_closed_line_matches(&*doc, line)
    {
        if cfg.trace {
            print_trace_line(&format!("Repair \"{}\"...", escape_for_log(line)));
        }
        return adopt_auto_closed_line(doc);
    }

    if index > 0 {
        doc.insert_newline()?;
        doc.move_to_beginning_of_line()?;
    }

    if cfg.trace && !line.is_empty() {
        print_trace_line(&format!("Typing \"{}\"...", escape_for_log(line)));
    }

    type_chars(doc, line, cancel, cfg, rng)
}

/// Type `text` character by character at the cursor.
///
/// The cancellation token is checked before every character; once a delay
/// has started it runs to completion and the character is inserted, so a
/// stop request commits at most one more keystroke. Whitespace is inserted
/// without delay.
pub fn type_chars(
    doc: &mut dyn Document,
    text: &str,
    cancel: &CancelToken,
    cfg: &TypingConfig,
    rng: &mut impl Rng,
) -> Result<()> {
    for c in text.chars() {
        if cancel.is_cancelled() {
            break;
        }

        let delay_ms = delay_for_char(c, &cfg.intervals_ms, rng);
        if delay_ms > 0 {
            thread::sleep(Duration::from_millis(delay_ms));
        }

        doc.insert_text(&c.to_string())?;
    }

    Ok(())
}

/// Does the line below the cursor already hold the upcoming source line?
///
/// Both sides are normalized the same way; empty normalizations never match,
/// otherwise a blank source line would adopt any auto-indented blank line.
fn auto_closed_line_matches(doc: &dyn Document, line: &str) -> bool {
    let Some(next) = doc.line_at(1) else {
        return false;
    };

    let want = normalized(line);
    !want.is_empty() && normalized(&next) == want
}

/// Adopt a pre-populated line instead of retyping it: move onto it, strip
/// its trailing whitespace, and re-add the statement terminator the host
/// swallowed when the line ends with a closing parenthesis.
fn adopt_auto_closed_line(doc: &mut dyn Document) -> Result<()> {
    doc.move_down(1)?;
    doc.move_to_end_of_line()?;

    let text = doc.line_at(0).unwrap_or_default();
    let trailing_ws = text.chars().rev().take_while(|c| c.is_whitespace()).count();
    if trailing_ws > 0 {
        doc.delete_backward(trailing_ws)?;
    }

    let text = doc.line_at(0).unwrap_or_default();
    if text.ends_with(')') {
        doc.insert_text(";")?;
    }

    Ok(())
}

/// Shared comparison rule for "the editor already typed this line":
/// surrounding whitespace and one trailing semicolon are insignificant.
fn normalized(line: &str) -> &str {
    let trimmed = line.trim();
    match trimmed.strip_suffix(';') {
        Some(rest) => rest.trim_end(),
        None => trimmed,
    }
}
