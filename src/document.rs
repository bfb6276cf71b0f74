use anyhow::Result;

/// The slice of a host editor the typing engine needs.
///
/// Queries are infallible; mutators surface host failures, which the session
/// controller absorbs as a failed run. The cursor belongs to the document:
/// the engine re-queries line text instead of caching positions, so external
/// cursor behavior (auto-indent, bracket skip) cannot drift out from under it.
pub trait Document {
    /// Grammar/language name of the document, e.g. "JavaScript".
    fn language_name(&self) -> String;

    /// Current cursor position as (row, column), both zero-based.
    fn cursor_position(&self) -> (usize, usize);

    /// Text of the line `row_offset` rows from the cursor row.
    ///
    /// `None` when the addressed row is outside the buffer.
    fn line_at(&self, row_offset: isize) -> Option<String>;

    /// Insert text at the cursor; the cursor advances past the insertion.
    fn insert_text(&mut self, text: &str) -> Result<()>;

    /// Break the current line at the cursor and move to the new line.
    fn insert_newline(&mut self) -> Result<()>;

    fn move_to_beginning_of_line(&mut self) -> Result<()>;

    fn move_to_end_of_line(&mut self) -> Result<()>;

    /// Move the cursor down `rows` rows, clamped to the last line.
    fn move_down(&mut self, rows: usize) -> Result<()>;

    /// Delete `count` characters before the cursor, joining lines at column 0.
    fn delete_backward(&mut self, count: usize) -> Result<()>;
}

/// In-memory line/cursor document.
///
/// Used as the CLI's console preview target and as the test double for the
/// host editor. With `with_auto_close_braces(true)` it mimics the host
/// assistance the JavaScript corrector compensates for: a `{` typed at the
/// end of a line grows a matching close line below it.
#[derive(Debug, Clone)]
pub struct BufferDocument {
    lines: Vec<String>,
    row: usize,
    col: usize,
    language: String,
    auto_close_braces: bool,
}

impl Default for BufferDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferDocument {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            language: "Plain Text".to_string(),
            auto_close_braces: false,
        }
    }

    /// Seed the buffer with existing lines, cursor at the origin.
    pub fn from_lines(lines: &[&str]) -> Self {
        let mut doc = Self::new();
        if !lines.is_empty() {
            doc.lines = lines.iter().map(|l| l.to_string()).collect();
        }
        doc
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_auto_close_braces(mut self, enabled: bool) -> Self {
        self.auto_close_braces = enabled;
        self
    }

    /// Full buffer contents with `\n` line separators.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line_char_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.break_line();
            return;
        }

        let line = &mut self.lines[self.row];
        let at = Self::byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;

        if c == '{' && self.auto_close_braces && self.col == self.line_char_len(self.row) {
            self.auto_close_brace();
        }
    }

    fn break_line(&mut self) {
        let line = &mut self.lines[self.row];
        let at = Self::byte_index(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Grow a matching close line below the cursor row, indented like the
    /// opening line. The cursor stays where it is.
    fn auto_close_brace(&mut self) {
        let indent: String = self.lines[self.row]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.lines.insert(self.row + 1, format!("{indent}}}"));
    }
}

impl Document for BufferDocument {
    fn language_name(&self) -> String {
        self.language.clone()
    }

    fn cursor_position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_at(&self, row_offset: isize) -> Option<String> {
        let row = self.row as isize + row_offset;
        if row < 0 {
            return None;
        }
        self.lines.get(row as usize).cloned()
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.insert_char(c);
        }
        Ok(())
    }

    fn insert_newline(&mut self) -> Result<()> {
        self.break_line();
        Ok(())
    }

    fn move_to_beginning_of_line(&mut self) -> Result<()> {
        self.col = 0;
        Ok(())
    }

    fn move_to_end_of_line(&mut self) -> Result<()> {
        self.col = self.line_char_len(self.row);
        Ok(())
    }

    fn move_down(&mut self, rows: usize) -> Result<()> {
        self.row = (self.row + rows).min(self.lines.len() - 1);
        self.col = self.col.min(self.line_char_len(self.row));
        Ok(())
    }

    fn delete_backward(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            if self.col > 0 {
                let line = &mut self.lines[self.row];
                let at = Self::byte_index(line, self.col - 1);
                line.remove(at);
                self.col -= 1;
            } else if self.row > 0 {
                let current = self.lines.remove(self.row);
                self.row -= 1;
                self.col = self.line_char_len(self.row);
                self.lines[self.row].push_str(&current);
            } else {
                break;
            }
        }
        Ok(())
    }
}
