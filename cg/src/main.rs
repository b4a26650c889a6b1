//! CampaignGen CLI
//!
//! Entry point for generating, rendering and serving campaign plans.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, info};

use campaigngen::cli::{Cli, Command, generate_after_help, get_log_path, resolve_output};
use campaigngen::config::Config;
use campaigngen::llm::{StreamChunk, create_client};
use campaigngen::planner::Planner;
use campaigngen::prompts::PromptLoader;
use campaigngen::server::{AppState, run_serve};
use plandoc::OutputFormat;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("CampaignGen loaded config: provider={} model={}", config.llm.provider, config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            brief,
            file,
            output,
            format,
            stream,
            print,
        } => {
            let brief = read_brief(brief.as_deref(), file.as_deref())?;
            cmd_generate(&config, &brief, output.as_deref(), format, stream, print).await
        }
        Command::Render { input, output, format } => cmd_render(&config, &input, output.as_deref(), format),
        Command::Serve { bind, port } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);
            cmd_serve(&config, &bind, port).await
        }
        Command::Prompt { brief } => {
            let brief = read_brief(brief.as_deref(), None)?;
            cmd_prompt(&brief)
        }
    }
}

/// Read the brief from the argument, a file, or stdin
fn read_brief(arg: Option<&str>, file: Option<&Path>) -> Result<String> {
    debug!(has_arg = arg.is_some(), ?file, "read_brief: called");
    let brief = match (arg, file) {
        (_, Some(path)) => {
            fs::read_to_string(path).context(format!("Failed to read brief from {}", path.display()))?
        }
        (Some(text), None) if text != "-" => text.to_string(),
        _ => read_stdin()?,
    };

    if brief.trim().is_empty() {
        bail!("Campaign brief is empty");
    }
    Ok(brief)
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn build_planner(config: &Config) -> Result<Planner> {
    config.validate().context("Invalid configuration")?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = Arc::new(PromptLoader::new("."));
    Ok(Planner::new(llm, prompts, &config.llm))
}

async fn cmd_generate(
    config: &Config,
    brief: &str,
    output: Option<&Path>,
    format: OutputFormat,
    stream: bool,
    print: bool,
) -> Result<()> {
    debug!(%format, stream, print, "cmd_generate: called");
    let planner = build_planner(config)?;

    let plan = if stream {
        let (tx, mut rx) = mpsc::channel(64);
        let printer = tokio::spawn(async move {
            let mut stdout = std::io::stdout();
            while let Some(chunk) = rx.recv().await {
                if let StreamChunk::TextDelta(text) = chunk {
                    let _ = write!(stdout, "{}", text);
                    let _ = stdout.flush();
                }
            }
            let _ = writeln!(stdout);
        });
        let plan = planner.generate_streaming(brief, tx).await;
        let _ = printer.await;
        plan?
    } else {
        eprintln!("{}", "Generating plan...".dimmed());
        planner.generate(brief).await?
    };

    if print && !stream {
        println!("{}", plan);
    }

    let path = write_document(config, &plan, output, format)?;
    println!("{} {}", "Saved".green().bold(), path.display());
    Ok(())
}

fn cmd_render(config: &Config, input: &Path, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(?input, %format, "cmd_render: called");
    let plan = if input == Path::new("-") {
        read_stdin()?
    } else {
        fs::read_to_string(input).context(format!("Failed to read plan from {}", input.display()))?
    };

    let path = write_document(config, &plan, output, format)?;
    println!("{} {}", "Saved".green().bold(), path.display());
    Ok(())
}

fn write_document(config: &Config, plan: &str, output: Option<&Path>, format: OutputFormat) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    let exporter = format.exporter(config.document.theme());
    let bytes = plandoc::render(plan, &config.document.branding(), today, exporter.as_ref())
        .context("Failed to render document")?;

    let path = resolve_output(output, &config.document.output_dir, format);
    plandoc::save(&bytes, &path).context(format!("Failed to write {}", path.display()))?;
    Ok(path)
}

async fn cmd_serve(config: &Config, bind: &str, port: u16) -> Result<()> {
    debug!(%bind, %port, "cmd_serve: called");
    let planner = build_planner(config)?;
    let state = AppState {
        planner: Arc::new(planner),
        branding: config.document.branding(),
        theme: config.document.theme(),
    };

    println!("{} http://{}:{}", "Listening on".green().bold(), bind, port);
    run_serve(state, bind, port).await
}

fn cmd_prompt(brief: &str) -> Result<()> {
    debug!("cmd_prompt: called");
    let loader = PromptLoader::new(".");
    println!("{}", "System:".bold());
    println!("{}\n", loader.system_prompt()?);
    println!("{}", "User:".bold());
    println!("{}", loader.render_brief(brief.trim())?);
    Ok(())
}
