//! DOCX exporter
//!
//! Lays the document out as a Word file: a centered cover page, a page
//! break, then teal headings, bulleted lists, a shaded budget table and the
//! budget bars as literal glyph strings.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText, LineSpacing,
    NumberFormat, Numbering, NumberingId, Paragraph, Run, Shading, Start, Style, StyleType, Table, TableCell,
    TableRow, WidthType,
};
use tracing::debug;

use super::{Exporter, OutputFormat};
use crate::document::{Block, BudgetBar, BudgetTable, Cover, Document, Element, SectionBlock};
use crate::error::ExportError;

pub const DEFAULT_ACCENT: &str = "11C4D3";
pub const DEFAULT_MUTED: &str = "666666";

// `Docx::new()` already registers a decimal list under id 1
const BULLET_NUMBERING_ID: usize = 2;

// Run sizes are in half-points
const PRODUCT_SIZE: usize = 96;
const TITLE_SIZE: usize = 64;
const HEADING_SIZE: usize = 32;
const SUBHEADING_SIZE: usize = 28;
const BAR_SIZE: usize = 24;

// Table spans the text width of a Letter page with 1" margins (twips)
const TABLE_GRID: [usize; 2] = [4680, 4680];
// Fiftieths of a percent
const FULL_WIDTH_PCT: usize = 5000;

/// Colors used by the DOCX layout, as 6-digit hex without `#`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Headings, table header fill, bars
    pub accent: String,
    /// Cover date line
    pub muted: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT.to_string(),
            muted: DEFAULT_MUTED.to_string(),
        }
    }
}

impl Theme {
    pub fn validate(&self) -> Result<(), ExportError> {
        check_color("accent", &self.accent)?;
        check_color("muted", &self.muted)
    }
}

fn check_color(field: &'static str, value: &str) -> Result<(), ExportError> {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ExportError::InvalidTheme {
            field,
            value: value.to_string(),
        })
    }
}

/// Word-processor exporter
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
    theme: Theme,
}

impl DocxExporter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn base(&self) -> Docx {
        let bullet = Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("•"),
            LevelJc::new("left"),
        );

        Docx::new()
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .name("Heading 1")
                    .bold()
                    .color(&self.theme.accent)
                    .size(HEADING_SIZE),
            )
            .add_style(
                Style::new("Heading2", StyleType::Paragraph)
                    .name("Heading 2")
                    .bold()
                    .color(&self.theme.accent)
                    .size(SUBHEADING_SIZE),
            )
            .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(bullet))
            .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
    }

    fn cover(&self, docx: Docx, cover: &Cover) -> Docx {
        docx.add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(300))
                .add_run(
                    Run::new()
                        .add_text(&cover.product_name)
                        .bold()
                        .color(&self.theme.accent)
                        .size(PRODUCT_SIZE),
                ),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(300))
                .add_run(Run::new().add_text(&cover.title).bold().size(TITLE_SIZE)),
        )
        .add_paragraph(
            Paragraph::new().align(AlignmentType::Center).add_run(
                Run::new()
                    .add_text(format!("Generated {}", cover.generated))
                    .italic()
                    .color(&self.theme.muted),
            ),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
    }

    fn section(&self, mut docx: Docx, section: &SectionBlock) -> Docx {
        docx = docx.add_paragraph(
            Paragraph::new()
                .style("Heading1")
                .line_spacing(LineSpacing::new().after(150))
                .add_run(
                    Run::new()
                        .add_text(&section.heading)
                        .bold()
                        .color(&self.theme.accent)
                        .size(HEADING_SIZE),
                ),
        );

        for element in &section.elements {
            let paragraph = match element {
                Element::Bullet(text) => Paragraph::new()
                    .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0))
                    .add_run(Run::new().add_text(text)),
                Element::Paragraph(text) => Paragraph::new().add_run(Run::new().add_text(text)),
                Element::Spacer => Paragraph::new().line_spacing(LineSpacing::new().after(200)),
            };
            docx = docx.add_paragraph(paragraph);
        }
        docx
    }

    fn subheading(&self, docx: Docx, text: &str) -> Docx {
        docx.add_paragraph(
            Paragraph::new()
                .style("Heading2")
                .line_spacing(LineSpacing::new().before(150).after(100))
                .add_run(
                    Run::new()
                        .add_text(text)
                        .bold()
                        .color(&self.theme.accent)
                        .size(SUBHEADING_SIZE),
                ),
        )
    }

    fn table(&self, docx: Docx, table: &BudgetTable) -> Docx {
        let header = TableRow::new(
            table
                .header
                .iter()
                .map(|text| {
                    TableCell::new()
                        .shading(Shading::new().fill(&self.theme.accent))
                        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text).bold()))
                })
                .collect(),
        );

        let rows = table.rows.iter().map(|row| {
            TableRow::new(
                row.iter()
                    .map(|text| TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text))))
                    .collect(),
            )
        });

        let mut all_rows = Vec::with_capacity(table.rows.len() + 1);
        all_rows.push(header);
        all_rows.extend(rows);

        docx.add_table(
            Table::new(all_rows)
                .set_grid(TABLE_GRID.to_vec())
                .width(FULL_WIDTH_PCT, WidthType::Pct),
        )
    }

    fn layout(&self, doc: &Document) -> Docx {
        doc.blocks.iter().fold(self.base(), |docx, block| match block {
            Block::Cover(cover) => self.cover(docx, cover),
            Block::Section(section) => self.section(docx, section),
            Block::Subheading(text) => self.subheading(docx, text),
            Block::Table(table) => self.table(docx, table),
            Block::Bar(bar) => self.bar(docx, bar),
        })
    }

    fn bar(&self, docx: Docx, bar: &BudgetBar) -> Docx {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(&bar.label).bold()))
            .add_paragraph(
                Paragraph::new().line_spacing(LineSpacing::new().after(120)).add_run(
                    Run::new()
                        .add_text(bar.bar())
                        .color(&self.theme.accent)
                        .size(BAR_SIZE),
                ),
            )
    }
}

impl Exporter for DocxExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn export(&self, doc: &Document) -> Result<Vec<u8>, ExportError> {
        debug!(block_count = doc.blocks.len(), "DocxExporter::export: called");
        self.theme.validate()?;

        let docx = self.layout(doc);
        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| ExportError::Package(e.to_string()))?;

        let bytes = cursor.into_inner();
        if bytes.is_empty() {
            return Err(ExportError::Package("packager produced no output".to_string()));
        }

        debug!(len = bytes.len(), "DocxExporter::export: packaged");
        Ok(bytes)
    }
}
