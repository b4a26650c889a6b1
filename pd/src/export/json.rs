//! JSON exporter: the document tree, pretty-printed

use tracing::debug;

use super::{Exporter, OutputFormat};
use crate::document::Document;
use crate::error::ExportError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn export(&self, doc: &Document) -> Result<Vec<u8>, ExportError> {
        debug!(block_count = doc.blocks.len(), "JsonExporter::export: called");
        let mut bytes = serde_json::to_vec_pretty(doc)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_document;
    use crate::document::Branding;
    use chrono::NaiveDate;

    #[test]
    fn test_json_shape() {
        let doc = build_document(
            "### Budget\nAds  $10\n",
            &Branding::default(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        );

        let bytes = JsonExporter.export(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let blocks = value["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["type"], "cover");
        assert_eq!(blocks[0]["data"]["generated"], "1/2/2025");
        assert_eq!(blocks[1]["type"], "section");
        assert_eq!(blocks[1]["data"]["heading"], "Budget");
        assert_eq!(blocks[1]["data"]["elements"][0]["type"], "paragraph");
        assert_eq!(blocks[1]["data"]["elements"][1]["type"], "spacer");
        assert_eq!(blocks[2]["type"], "subheading");
        assert_eq!(blocks[2]["data"], "Budget Allocation");
        assert_eq!(blocks[3]["type"], "table");
        assert_eq!(blocks[3]["data"]["rows"][0][1], "$10");
        assert_eq!(blocks[4]["type"], "bar");
        assert_eq!(blocks[4]["data"]["units"], 28);
        assert_eq!(blocks[4]["data"]["glyph"], "█");
    }

    #[test]
    fn test_json_is_byte_identical_for_same_input() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let a = JsonExporter
            .export(&build_document("### A\n- x", &Branding::default(), date))
            .unwrap();
        let b = JsonExporter
            .export(&build_document("### A\n- x", &Branding::default(), date))
            .unwrap();
        assert_eq!(a, b);
    }
}
