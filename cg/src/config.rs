//! CampaignGen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use plandoc::{Branding, Theme};

/// Main CampaignGen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Document layout configuration
    pub document: DocumentConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

impl Config {
    /// Validate configuration before any LLM call
    ///
    /// Fails fast when the API key cannot be resolved.
    pub fn validate(&self) -> Result<()> {
        self.llm.get_api_key()?;
        self.document.theme().validate()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .campaigngen.yml
        let local_config = PathBuf::from(".campaigngen.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/campaigngen/campaigngen.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("campaigngen").join("campaigngen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: a broken config is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key, used when the environment variable is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: environment variable first, then key file
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(path) = &self.api_key_file {
            let path = expand_home(path);
            let key = fs::read_to_string(&path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
            return Err(eyre::eyre!("API key file {} is empty", path.display()));
        }

        Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))
    }
}

/// Document layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Name shown on the cover page
    #[serde(rename = "product-name")]
    pub product_name: String,

    /// Heading and bar color (6 hex digits)
    #[serde(rename = "accent-color")]
    pub accent_color: String,

    /// Cover date color (6 hex digits)
    #[serde(rename = "muted-color")]
    pub muted_color: String,

    /// strftime pattern for the cover date
    #[serde(rename = "date-format")]
    pub date_format: String,

    /// Directory generated documents are written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let branding = Branding::default();
        let theme = Theme::default();
        Self {
            product_name: branding.product_name,
            accent_color: theme.accent,
            muted_color: theme.muted,
            date_format: branding.date_format,
            output_dir: PathBuf::from("."),
        }
    }
}

impl DocumentConfig {
    pub fn branding(&self) -> Branding {
        Branding {
            product_name: self.product_name.clone(),
            date_format: self.date_format.clone(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme {
            accent: self.accent_color.trim_start_matches('#').to_string(),
            muted: self.muted_color.trim_start_matches('#').to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
