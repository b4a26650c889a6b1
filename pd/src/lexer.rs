//! Line lexer
//!
//! First stage of plan parsing: every raw line of plan text is classified on
//! its own, without looking at its neighbours. Grouping into sections happens
//! in [`crate::section`].

use serde::Serialize;
use tracing::debug;

/// Literal prefix that opens a new section
pub const HEADING_MARKER: &str = "### ";

/// Glyphs that mark a bulleted line
pub const BULLET_GLYPHS: [char; 3] = ['-', '•', '*'];

/// Title used when a heading marker carries no text
pub const UNTITLED: &str = "Details";

/// Classification of a single line of plan text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LineKind {
    /// `### Title` at column 0
    Heading(String),
    /// Line starting with a bullet glyph (after optional indentation)
    Bullet(String),
    /// Any other non-blank line
    Plain(String),
    /// Empty or whitespace-only line
    Blank,
}

impl LineKind {
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }
}

/// Classify one line of plan text
///
/// Headings must start at column 0; bullets and plain text are matched on the
/// trimmed line. Bullet text keeps its internal content, only the glyph and the
/// whitespace after it are removed.
pub fn classify(line: &str) -> LineKind {
    if let Some(rest) = line.strip_prefix(HEADING_MARKER) {
        let title = rest.trim();
        debug!(%title, "classify: heading");
        return LineKind::Heading(if title.is_empty() { UNTITLED } else { title }.to_string());
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    match trimmed.strip_prefix(BULLET_GLYPHS) {
        Some(rest) => LineKind::Bullet(rest.trim_start().to_string()),
        None => LineKind::Plain(trimmed.to_string()),
    }
}

/// Classify every line of `text` in order
pub fn lex(text: &str) -> Vec<LineKind> {
    debug!(text_len = text.len(), "lex: called");
    text.lines().map(classify).collect()
}

/// True if `text` has at least one heading marker line
pub fn has_heading(text: &str) -> bool {
    text.lines().any(|line| line.starts_with(HEADING_MARKER))
}
