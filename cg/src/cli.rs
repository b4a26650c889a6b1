//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use plandoc::OutputFormat;

/// CampaignGen - campaign brief to formatted plan document
#[derive(Parser)]
#[command(
    name = "cg",
    about = "Turn a messy campaign brief into a formatted campaign plan document",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a plan from a brief and write it as a document
    Generate {
        /// Campaign brief text ("-" or omitted reads stdin)
        brief: Option<String>,

        /// Read the brief from a file
        #[arg(long, conflicts_with = "brief")]
        file: Option<PathBuf>,

        /// Output directory or file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format (docx, json)
        #[arg(short, long, default_value = "docx")]
        format: OutputFormat,

        /// Echo the plan to stdout while it is generated
        #[arg(long)]
        stream: bool,

        /// Print the plan text once generated
        #[arg(long)]
        print: bool,
    },

    /// Render an existing plan text file without calling the LLM
    Render {
        /// Plan text file ("-" reads stdin)
        input: PathBuf,

        /// Output directory or file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format (docx, json)
        #[arg(short, long, default_value = "docx")]
        format: OutputFormat,
    },

    /// Serve the plan generator over HTTP
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the prompt that would be sent for a brief
    Prompt {
        /// Campaign brief text ("-" or omitted reads stdin)
        brief: Option<String>,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campaigngen")
        .join("logs")
        .join("campaigngen.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Help footer listing where logs go
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}\n", get_log_path().display())
}

/// Resolve where a document is written
///
/// An existing directory (or none, meaning `default_dir`) gets
/// `campaign_plan.<ext>` inside it; anything else is used as the file path.
pub fn resolve_output(output: Option<&Path>, default_dir: &Path, format: OutputFormat) -> PathBuf {
    debug!(?output, ?default_dir, %format, "resolve_output: called");
    match output {
        Some(path) if path.is_dir() => path.join(format.file_name()),
        Some(path) => path.to_path_buf(),
        None => default_dir.join(format.file_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::parse_from(["cg", "generate", "Launch a podcast"]);
        match cli.command {
            Command::Generate {
                brief,
                file,
                output,
                format,
                stream,
                print,
            } => {
                assert_eq!(brief.as_deref(), Some("Launch a podcast"));
                assert!(file.is_none());
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Docx);
                assert!(!stream);
                assert!(!print);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_generate_flags() {
        let cli = Cli::parse_from([
            "cg", "generate", "--file", "brief.txt", "-o", "out", "-f", "json", "--stream", "--print",
        ]);
        assert!(matches!(
            cli.command,
            Command::Generate {
                brief: None,
                file: Some(_),
                output: Some(_),
                format: OutputFormat::Json,
                stream: true,
                print: true,
            }
        ));
    }

    #[test]
    fn test_cli_generate_brief_conflicts_with_file() {
        assert!(Cli::try_parse_from(["cg", "generate", "text", "--file", "brief.txt"]).is_err());
    }

    #[test]
    fn test_cli_parse_render() {
        let cli = Cli::parse_from(["cg", "render", "plan.txt", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::Render {
                format: OutputFormat::Json,
                output: None,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cg", "render", "plan.txt", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["cg", "serve", "--port", "8080"]);
        assert!(matches!(
            cli.command,
            Command::Serve {
                bind: None,
                port: Some(8080)
            }
        ));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["cg", "prompt", "x", "-l", "debug", "-c", "cg.yml"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("cg.yml")));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cg"]).is_err());
    }

    #[test]
    fn test_resolve_output() {
        let dir = tempfile::tempdir().unwrap();
        let default_dir = Path::new("plans");

        assert_eq!(
            resolve_output(None, default_dir, OutputFormat::Docx),
            PathBuf::from("plans/campaign_plan.docx")
        );

        let existing = dir.path().to_path_buf();
        assert_eq!(
            resolve_output(Some(existing.as_path()), default_dir, OutputFormat::Json),
            existing.join("campaign_plan.json")
        );

        let file = PathBuf::from("custom.docx");
        assert_eq!(resolve_output(Some(file.as_path()), default_dir, OutputFormat::Docx), file);
    }

    #[test]
    fn test_after_help_mentions_logs() {
        assert!(generate_after_help().contains("campaigngen.log"));
    }
}
