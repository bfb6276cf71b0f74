use serde::Serialize;

use crate::interval::{mean_interval_ms, TYPING_INTERVALS_MS};

/// Keystroke statistics for a source text, computed before a run.
///
/// `expected_ms` assumes the default candidate intervals: paced keystrokes
/// cost the mean interval, whitespace and line breaks are instant.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SourceStats {
    pub lines: usize,
    pub characters: usize,
    pub paced_keystrokes: usize,
    pub instant_keystrokes: usize,
    pub expected_ms: u64,
}

pub fn source_stats(text: &str) -> SourceStats {
    let mut out = SourceStats {
        lines: text.split('\n').count(),
        ..Default::default()
    };

    for c in text.chars() {
        if c == '\n' {
            continue;
        }
        out.characters += 1;
        if c.is_whitespace() {
            out.instant_keystrokes += 1;
        } else {
            out.paced_keystrokes += 1;
        }
    }

    out.expected_ms = out.paced_keystrokes as u64 * mean_interval_ms(&TYPING_INTERVALS_MS);
    out
}
