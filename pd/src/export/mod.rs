//! Document exporters
//!
//! An [`Exporter`] turns an assembled [`Document`] into the bytes of one file.
//! DOCX is the production format; JSON dumps the document tree as-is.

mod docx;
mod json;

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::document::Document;
use crate::error::ExportError;

pub use docx::{DocxExporter, Theme};
pub use json::JsonExporter;

/// Base name of every generated file
pub const FILE_STEM: &str = "campaign_plan";

/// Serializes a document into a single file
pub trait Exporter: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn export(&self, doc: &Document) -> Result<Vec<u8>, ExportError>;
}

/// Supported output formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Docx,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Json => "application/json",
        }
    }

    /// `campaign_plan.<ext>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", FILE_STEM, self.extension())
    }

    /// Exporter for this format
    pub fn exporter(&self, theme: Theme) -> Box<dyn Exporter> {
        debug!(format = %self, "OutputFormat::exporter: called");
        match self {
            Self::Docx => Box::new(DocxExporter::new(theme)),
            Self::Json => Box::new(JsonExporter),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docx" | "word" => Ok(Self::Docx),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: docx or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Write `bytes` to `path` through a temp file in the same directory
///
/// The destination is only replaced once every byte is on disk, so a failed
/// write never leaves a truncated document behind.
pub fn save(bytes: &[u8], path: &Path) -> Result<(), ExportError> {
    debug!(path = %path.display(), len = bytes.len(), "save: called");
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;

    info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("docx".parse::<OutputFormat>(), Ok(OutputFormat::Docx)));
        assert!(matches!("DOCX".parse::<OutputFormat>(), Ok(OutputFormat::Docx)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(OutputFormat::Docx.file_name(), "campaign_plan.docx");
        assert_eq!(OutputFormat::Json.file_name(), "campaign_plan.json");
    }

    #[test]
    fn test_exporter_matches_format() {
        assert_eq!(OutputFormat::Docx.exporter(Theme::default()).format(), OutputFormat::Docx);
        assert_eq!(OutputFormat::Json.exporter(Theme::default()).format(), OutputFormat::Json);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_plan.json");

        save(b"{}", &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_plan.docx");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        save(b"new", &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_save_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("campaign_plan.docx");

        let result = save(b"data", &path);

        assert!(matches!(result, Err(ExportError::Io(_))));
        assert!(!path.exists());
    }
}
