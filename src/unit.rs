//! The unit of read/transform/write: one source file's text.

use std::path::{Path, PathBuf};

/// One source file's content together with its derived lines.
///
/// Lines keep their own terminators, so joining them reproduces the content
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    path: PathBuf,
    content: String,
    lines: Vec<String>,
}

impl TextUnit {
    /// Creates a unit from a path and its current content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let lines = split_lines(&content);
        Self {
            path: path.into(),
            content,
            lines,
        }
    }

    /// Returns the file path identifying this unit.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the full text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the lines, each with its terminator.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replaces the content and recomputes the lines.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.lines = split_lines(&self.content);
    }

    /// Replaces the lines and rebuilds the content from them.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.content = lines.concat();
        self.lines = lines;
    }

    /// Consumes the unit and returns its content.
    pub fn into_content(self) -> String {
        self.content
    }
}

/// Splits text into lines that keep their `\n` / `\r\n` terminators.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// Returns the terminator a line ends with, if any.
pub fn line_ending(line: &str) -> Option<&'static str> {
    if line.ends_with("\r\n") {
        Some("\r\n")
    } else if line.ends_with('\n') {
        Some("\n")
    } else {
        None
    }
}

/// Returns the terminator most lines in the text use, defaulting to `\n`.
pub fn dominant_line_ending(content: &str) -> &'static str {
    let total = content.matches('\n').count();
    let crlf = content.matches("\r\n").count();
    if crlf > 0 && crlf * 2 >= total {
        "\r\n"
    } else {
        "\n"
    }
}
