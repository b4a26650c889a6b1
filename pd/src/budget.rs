//! Budget extraction
//!
//! Finds the budget section of a plan and reads its lines as `item  amount`
//! columns, separated by runs of two or more whitespace chars. Columns past
//! the amount (shares, notes) are ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::section::Section;

/// Full-scale length of a budget bar, in glyphs
pub const BAR_WIDTH: usize = 28;

/// Column delimiter for budget lines
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("delimiter regex is valid"));

/// One line of the budget section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetEntry {
    pub item: String,
    /// Amount as written by the model, e.g. `$3,000`
    pub amount: String,
    /// Numeric amount; 0 when it cannot be parsed
    pub amount_value: f64,
}

impl BudgetEntry {
    /// Parse a single budget line
    ///
    /// A line without a delimiter is kept whole as the item with an empty amount.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut columns = DELIMITER.splitn(line, 3);
        let item = columns.next().unwrap_or_default();
        let amount = match columns.next() {
            Some(amount) => amount.trim(),
            None => {
                debug!(%line, "BudgetEntry::parse: no delimiter");
                ""
            }
        };

        Self {
            item: item.trim().to_string(),
            amount: amount.to_string(),
            amount_value: parse_amount(amount),
        }
    }
}

/// Read a display amount as a number
///
/// Every char other than ASCII digits and `.` is dropped first, so `$3,000`
/// reads as 3000. Empty or unparseable remainders read as 0.
pub fn parse_amount(amount: &str) -> f64 {
    let digits: String = amount.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// First section whose title mentions "budget", case-insensitively
pub fn find_budget_section(sections: &[Section]) -> Option<&Section> {
    sections.iter().find(|s| s.title_contains("budget"))
}

/// Budget entries from the first budget section, in line order
///
/// Returns an empty list when no section is titled as a budget.
pub fn extract_budget(sections: &[Section]) -> Vec<BudgetEntry> {
    debug!(section_count = sections.len(), "extract_budget: called");

    let Some(section) = find_budget_section(sections) else {
        debug!("extract_budget: no budget section");
        return Vec::new();
    };

    let entries: Vec<BudgetEntry> = section
        .body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(BudgetEntry::parse)
        .collect();

    let unpriced = entries.iter().filter(|e| e.amount.is_empty()).count();
    if unpriced > 0 {
        warn!(title = %section.title, unpriced, "extract_budget: lines without an amount column");
    }

    debug!(count = entries.len(), "extract_budget: done");
    entries
}

/// Largest amount across `entries`, or 1 when every amount is zero
pub fn max_amount(entries: &[BudgetEntry]) -> f64 {
    let max = entries.iter().map(|e| e.amount_value).fold(0.0_f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

/// Bar length for `value` relative to `max`, never shorter than one glyph
pub fn bar_units(value: f64, max: f64) -> usize {
    let max = if max > 0.0 { max } else { 1.0 };
    let units = (value / max * BAR_WIDTH as f64).round();
    (units as usize).max(1)
}
