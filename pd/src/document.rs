//! Document assembly
//!
//! Pure transformation from parsed sections and budget entries into an
//! immutable [`Document`] tree. Exporters only ever read this tree, so the
//! layout can be checked without producing any file.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::budget::{self, BudgetEntry};
use crate::section::{BodyLine, Section};

pub const DOCUMENT_TITLE: &str = "Campaign Plan";
pub const BUDGET_HEADING: &str = "Budget Allocation";
pub const TABLE_HEADER: [&str; 2] = ["Item", "Amount"];
pub const DEFAULT_PRODUCT_NAME: &str = "campaign.ai";
/// en-US short date, e.g. 7/4/2025
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
/// Full block, used for budget bars
pub const BAR_GLYPH: char = '█';

/// Cover page settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub product_name: String,
    /// chrono strftime pattern for the generation date
    pub date_format: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Branding {
    /// Format `date` with the configured pattern, falling back to the default
    /// pattern when the configured one is invalid
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            warn!(format = %self.date_format, "Branding::format_date: invalid date format, using default");
            out.clear();
            let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Block {
    Cover(Cover),
    Section(SectionBlock),
    Subheading(String),
    Table(BudgetTable),
    Bar(BudgetBar),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cover {
    pub product_name: String,
    pub title: String,
    pub generated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionBlock {
    pub heading: String,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Element {
    Bullet(String),
    Paragraph(String),
    /// Vertical space after a section
    Spacer,
}

impl From<BodyLine> for Element {
    fn from(line: BodyLine) -> Self {
        match line {
            BodyLine::Bullet(text) => Element::Bullet(text),
            BodyLine::Paragraph(text) => Element::Paragraph(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetTable {
    pub header: [String; 2],
    pub rows: Vec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetBar {
    /// `"{item}: {amount}"`
    pub label: String,
    pub units: usize,
    pub glyph: char,
}

impl BudgetBar {
    /// The bar as literal text
    pub fn bar(&self) -> String {
        self.glyph.to_string().repeat(self.units)
    }
}

impl Document {
    pub fn cover(&self) -> Option<&Cover> {
        self.blocks.iter().find_map(|b| match b {
            Block::Cover(cover) => Some(cover),
            _ => None,
        })
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Section(section) => Some(section),
            _ => None,
        })
    }

    pub fn table(&self) -> Option<&BudgetTable> {
        self.blocks.iter().find_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = &BudgetBar> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Bar(bar) => Some(bar),
            _ => None,
        })
    }
}

/// Build the document tree
///
/// The date is passed in rather than read from the clock so identical inputs
/// always produce identical documents.
pub fn assemble(sections: &[Section], entries: &[BudgetEntry], branding: &Branding, generated: NaiveDate) -> Document {
    debug!(
        section_count = sections.len(),
        entry_count = entries.len(),
        "assemble: called"
    );

    let mut blocks = Vec::with_capacity(1 + sections.len() + 2 + entries.len());

    blocks.push(Block::Cover(Cover {
        product_name: branding.product_name.clone(),
        title: DOCUMENT_TITLE.to_string(),
        generated: branding.format_date(generated),
    }));

    blocks.extend(sections.iter().map(|section| Block::Section(section_block(section))));

    if !entries.is_empty() {
        debug!("assemble: adding budget table and bars");
        blocks.push(Block::Subheading(BUDGET_HEADING.to_string()));
        blocks.push(Block::Table(budget_table(entries)));
        blocks.extend(budget_bars(entries).into_iter().map(Block::Bar));
    }

    Document { blocks }
}

fn section_block(section: &Section) -> SectionBlock {
    let mut elements: Vec<Element> = section.lines().into_iter().map(Element::from).collect();
    elements.push(Element::Spacer);
    SectionBlock {
        heading: section.title.clone(),
        elements,
    }
}

fn budget_table(entries: &[BudgetEntry]) -> BudgetTable {
    BudgetTable {
        header: TABLE_HEADER.map(String::from),
        rows: entries.iter().map(|e| [e.item.clone(), e.amount.clone()]).collect(),
    }
}

fn budget_bars(entries: &[BudgetEntry]) -> Vec<BudgetBar> {
    let max = budget::max_amount(entries);
    entries
        .iter()
        .map(|e| BudgetBar {
            label: format!("{}: {}", e.item, e.amount),
            units: budget::bar_units(e.amount_value, max),
            glyph: BAR_GLYPH,
        })
        .collect()
}
