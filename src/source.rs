use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A file to retype, addressed by path.
///
/// Existence is checked separately from reading so the controller can reject
/// a bad path with a warning before a session ever starts.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }
}

/// The lines of a source document, in typing order. Read-only once built.
///
/// Splitting keeps the empty element a trailing newline produces, so retyping
/// a file that ends in a newline reproduces that newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    pub fn from_content(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
