//! PlanDoc - campaign plan text to document
//!
//! Turns the semi-structured text an LLM returns for a campaign brief into a
//! formatted document with a cover page, section headings, bullet lists and a
//! budget table with proportional bars.
//!
//! # Pipeline
//!
//! 1. [`lexer`] - classify each line (heading, bullet, plain, blank)
//! 2. [`section`] - group lines into titled sections
//! 3. [`budget`] - read the budget section as `item  amount` pairs
//! 4. [`document`] - assemble an immutable document tree
//! 5. [`export`] - serialize the tree (DOCX or JSON)
//!
//! Every stage is a pure function of its input; only [`export::save`] touches
//! the filesystem.

pub mod budget;
pub mod document;
pub mod error;
pub mod export;
pub mod lexer;
pub mod section;

use chrono::NaiveDate;
use tracing::{debug, info};

pub use budget::{BudgetEntry, extract_budget};
pub use document::{Block, Branding, Document, assemble};
pub use error::ExportError;
pub use export::{DocxExporter, Exporter, JsonExporter, OutputFormat, Theme, save};
pub use lexer::LineKind;
pub use section::{BodyLine, Section, parse_sections};

/// Parse plan text and assemble the document tree
pub fn build_document(text: &str, branding: &Branding, generated: NaiveDate) -> Document {
    debug!(text_len = text.len(), %generated, "build_document: called");
    let sections = parse_sections(text);
    let entries = extract_budget(&sections);
    info!(
        "Assembling document: {} sections, {} budget entries",
        sections.len(),
        entries.len()
    );
    assemble(&sections, &entries, branding, generated)
}

/// Full pipeline: plan text to file bytes
pub fn render(
    text: &str,
    branding: &Branding,
    generated: NaiveDate,
    exporter: &dyn Exporter,
) -> Result<Vec<u8>, ExportError> {
    debug!(format = %exporter.format(), "render: called");
    let doc = build_document(text, branding, generated);
    exporter.export(&doc)
}
