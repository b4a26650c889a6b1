//! Section grouping
//!
//! Second stage of plan parsing: lexed lines are grouped into titled sections
//! at every heading marker. Text without any marker becomes a single
//! "Campaign Overview" section.

use serde::Serialize;
use tracing::debug;

use crate::lexer::{self, LineKind, UNTITLED};

/// Title used when the plan text has no heading markers at all
pub const FALLBACK_TITLE: &str = "Campaign Overview";

/// A titled block of plan text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    /// Raw body with the marker line removed, trimmed
    pub body: String,
}

/// A body line as it is laid out in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum BodyLine {
    Bullet(String),
    Paragraph(String),
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Body split into bullets and paragraphs, blank lines dropped
    pub fn lines(&self) -> Vec<BodyLine> {
        debug!(title = %self.title, "Section::lines: called");
        self.body
            .lines()
            .filter_map(|line| match lexer::classify(line) {
                LineKind::Bullet(text) => Some(BodyLine::Bullet(text)),
                LineKind::Plain(text) => Some(BodyLine::Paragraph(text)),
                // Bodies never hold marker lines; keep the text if one slips through
                LineKind::Heading(_) => Some(BodyLine::Paragraph(line.trim().to_string())),
                LineKind::Blank => None,
            })
            .collect()
    }
}

/// Split plan text into ordered sections
pub fn parse_sections(text: &str) -> Vec<Section> {
    debug!(text_len = text.len(), "parse_sections: called");

    if !lexer::has_heading(text) {
        debug!("parse_sections: no heading markers, using fallback section");
        return vec![Section::new(FALLBACK_TITLE, text.trim())];
    }

    let mut sections = Vec::new();
    // None while still in the text before the first marker
    let mut title: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in text.lines() {
        match lexer::classify(line) {
            LineKind::Heading(next) => {
                push_section(&mut sections, title.take(), &body);
                body.clear();
                title = Some(next);
            }
            _ => body.push(line),
        }
    }
    push_section(&mut sections, title, &body);

    debug!(count = sections.len(), "parse_sections: done");
    sections
}

fn push_section(sections: &mut Vec<Section>, title: Option<String>, body: &[&str]) {
    let body = body.join("\n").trim().to_string();
    match title {
        Some(title) => sections.push(Section::new(title, body)),
        None if !body.is_empty() => {
            debug!("push_section: keeping text before first heading");
            sections.push(Section::new(UNTITLED, body));
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_fallback() {
        let sections = parse_sections("  Just a paragraph.\nAnd another.\n\n");
        assert_eq!(sections, vec![Section::new("Campaign Overview", "Just a paragraph.\nAnd another.")]);
    }

    #[test]
    fn test_sentinel_text_is_wrapped() {
        let sections = parse_sections("Error: Failed to generate plan.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Campaign Overview");
        assert_eq!(sections[0].body, "Error: Failed to generate plan.");
    }

    #[test]
    fn test_empty_input() {
        let sections = parse_sections("");
        assert_eq!(sections, vec![Section::new("Campaign Overview", "")]);
    }

    #[test]
    fn test_marker_split() {
        let sections = parse_sections("### A\nfoo\n### B\nbar");
        assert_eq!(sections, vec![Section::new("A", "foo"), Section::new("B", "bar")]);
    }

    #[test]
    fn test_body_is_trimmed_and_multiline() {
        let sections = parse_sections("### Objectives\n\n- one\n- two\n\n\n### KPIs\n  CTR > 2%  \n");
        assert_eq!(sections[0].body, "- one\n- two");
        assert_eq!(sections[1].body, "CTR > 2%");
    }

    #[test]
    fn test_blank_leading_text_is_dropped() {
        let sections = parse_sections("\n\n   \n### A\nfoo");
        assert_eq!(sections, vec![Section::new("A", "foo")]);
    }

    #[test]
    fn test_leading_text_becomes_details() {
        let sections = parse_sections("Here is your plan:\n### A\nfoo");
        assert_eq!(
            sections,
            vec![Section::new("Details", "Here is your plan:"), Section::new("A", "foo")]
        );
    }

    #[test]
    fn test_heading_without_body() {
        let sections = parse_sections("### A\n### B\nbar");
        assert_eq!(sections, vec![Section::new("A", ""), Section::new("B", "bar")]);
    }

    #[test]
    fn test_inline_hashes_are_not_markers() {
        let sections = parse_sections("Use ### sparingly\nok");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Campaign Overview");
    }

    #[test]
    fn test_lines_classification() {
        let section = Section::new("Objectives", "- grow leads\nGrow leads\n\n• reach\n* convert\n-");
        assert_eq!(
            section.lines(),
            vec![
                BodyLine::Bullet("grow leads".to_string()),
                BodyLine::Paragraph("Grow leads".to_string()),
                BodyLine::Bullet("reach".to_string()),
                BodyLine::Bullet("convert".to_string()),
                BodyLine::Bullet(String::new()),
            ]
        );
    }

    #[test]
    fn test_title_contains_is_case_insensitive() {
        let section = Section::new("Budget Breakdown (USD)", "");
        assert!(section.title_contains("budget"));
        assert!(section.title_contains("BUDGET"));
        assert!(!section.title_contains("timeline"));
    }
}
