use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{ensure, Result};
use rand::Rng;

use crate::document::Document;
use crate::interval::TYPING_INTERVALS_MS;
use crate::notify::Notifier;
use crate::source::{SourceFile, SourceText};
use crate::typist::{self, LanguageMode};

const BUSY_WARNING: &str = "Cannot run auto-type while auto-typing";

/// Cooperative cancellation handle, shared between the typing session and
/// stop requesters on other threads (e.g. a Ctrl+C handler).
///
/// The token is polled at every suspension point: before each character and
/// before each line. It never interrupts an in-flight delay, so a stop
/// request can commit at most one more pending keystroke.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn rearm(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct TypingConfig {
    /// Candidate inter-keystroke delays in milliseconds.
    pub intervals_ms: Vec<u64>,

    /// Print a console trace line per typed line.
    pub trace: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            intervals_ms: TYPING_INTERVALS_MS.to_vec(),
            trace: false,
        }
    }
}

fn validate_config(cfg: &TypingConfig) -> Result<()> {
    ensure!(
        !cfg.intervals_ms.is_empty(),
        "intervals_ms must not be empty"
    );
    Ok(())
}

/// How a start request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// All lines were typed.
    Completed,

    /// A stop request halted the session at a checkpoint; the document keeps
    /// whatever partial state existed (no rollback).
    Cancelled,

    /// A runtime failure (file read, document mutation) ended the session.
    /// Logged to stderr, never re-raised past the controller.
    Failed,

    /// Pre-flight refusal (already typing, or the file does not exist); a
    /// warning was shown and no session ran.
    Rejected,
}

/// Drives one typing session at a time against an injected document.
///
/// At most one session can be active; concurrent start requests are rejected
/// with a warning and leave the running session untouched. Every terminal
/// state restores the idle flags, however the session ended.
pub struct TypingController<N: Notifier> {
    config: TypingConfig,
    notifier: N,
    typing: AtomicBool,
    cancel: CancelToken,
}

impl<N: Notifier> TypingController<N> {
    pub fn new(config: TypingConfig, notifier: N) -> Self {
        Self {
            config,
            notifier,
            typing: AtomicBool::new(false),
            cancel: CancelToken::new(),
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handle for stop requests from other threads.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The "stop typing" command: flips the shared token. Observed at the
    /// session's next checkpoint; a no-op when nothing is typing.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// The "start typing from file" command.
    ///
    /// Blocks until the session reaches a terminal state. Pre-flight
    /// rejections (busy, missing file) warn and return without touching any
    /// document; runtime failures are logged and absorbed.
    pub fn start_from_file(
        &self,
        doc: &mut dyn Document,
        file: &SourceFile,
        rng: &mut impl Rng,
    ) -> SessionOutcome {
        if self.is_typing() {
            self.notifier.warn(BUSY_WARNING);
            return SessionOutcome::Rejected;
        }

        if !file.exists() {
            self.notifier
                .warn(&format!("The file {} does not exist.", file.path().display()));
            return SessionOutcome::Rejected;
        }

        self.run_session(doc, rng, || file.read())
    }

    /// Type already-loaded content, skipping the file preflight.
    pub fn start_with_content(
        &self,
        doc: &mut dyn Document,
        content: &str,
        rng: &mut impl Rng,
    ) -> SessionOutcome {
        self.run_session(doc, rng, || Ok(content.to_string()))
    }

    fn run_session(
        &self,
        doc: &mut dyn Document,
        rng: &mut impl Rng,
        read: impl FnOnce() -> Result<String>,
    ) -> SessionOutcome {
        if self
            .typing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.notifier.warn(BUSY_WARNING);
            return SessionOutcome::Rejected;
        }

        self.cancel.rearm();

        let outcome = match self.type_document(doc, rng, read) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("auto-type session failed: {err:#}");
                SessionOutcome::Failed
            }
        };

        // All terminal states converge here, whatever happened above.
        self.typing.store(false, Ordering::SeqCst);
        self.cancel.rearm();

        outcome
    }

    fn type_document(
        &self,
        doc: &mut dyn Document,
        rng: &mut impl Rng,
        read: impl FnOnce() -> Result<String>,
    ) -> Result<SessionOutcome> {
        validate_config(&self.config)?;

        let content = read()?;
        let source = SourceText::from_content(&content);
        let correction = LanguageMode::detect(&doc.language_name()).correction();

        // Start at column 0 when the cursor sits on a blank line, so host
        // auto-indent cannot push the first line sideways.
        if doc.line_at(0).unwrap_or_default().is_empty() {
            doc.move_to_beginning_of_line()?;
        }

        for (index, line) in source.lines().iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            typist::type_line(doc, line, index, correction, &self.cancel, &self.config, rng)?;
        }

        Ok(if self.cancel.is_cancelled() {
            SessionOutcome::Cancelled
        } else {
            SessionOutcome::Completed
        })
    }
}
