use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{
    Cli, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_OUTPUT, DEFAULT_PARALLEL_PAGES,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKENIZER,
};

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// The URL of the page to audit
    pub url: Option<String>,

    /// File with one URL per line
    pub file: Option<String>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Maximum number of simultaneous link probes
    pub concurrency: Option<usize>,

    /// Link probe timeout in seconds
    pub timeout: Option<u64>,

    /// Page fetch timeout in seconds
    pub fetch_timeout: Option<u64>,

    /// Deadline for the whole audit in seconds
    pub audit_timeout: Option<u64>,

    /// Number of pages audited in parallel
    pub parallel_pages: Option<usize>,

    /// Rate limit for link probes per second
    pub rate_limit: Option<f64>,

    /// Skip link reachability checks
    pub skip_link_check: Option<bool>,

    /// Keyword tokenizer: standard or fallback
    pub tokenizer: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("pagescout.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|p| {
                if p.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_config_dir = config_home.join("pagescout");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads the file named by `--config`, or the first default config found
    pub fn load(cli: &Cli) -> Result<Option<Self>> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)).map(Some),
            None => Self::from_default_paths(),
        }
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            // A URL source given on the command line replaces both config sources
            url: if cli.file.is_some() {
                cli.url.clone()
            } else {
                cli.url.clone().or_else(|| self.url.clone())
            },
            file: if cli.url.is_some() {
                cli.file.clone()
            } else {
                cli.file.clone().or_else(|| self.file.clone())
            },
            output: if cli.output != DEFAULT_OUTPUT {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            concurrency: if cli.concurrency != DEFAULT_CONCURRENCY {
                cli.concurrency
            } else {
                self.concurrency.unwrap_or(cli.concurrency)
            },
            timeout: if cli.timeout != DEFAULT_TIMEOUT_SECS {
                cli.timeout
            } else {
                self.timeout.unwrap_or(cli.timeout)
            },
            fetch_timeout: if cli.fetch_timeout != DEFAULT_FETCH_TIMEOUT_SECS {
                cli.fetch_timeout
            } else {
                self.fetch_timeout.unwrap_or(cli.fetch_timeout)
            },
            audit_timeout: cli.audit_timeout.or(self.audit_timeout),
            parallel_pages: if cli.parallel_pages != DEFAULT_PARALLEL_PAGES {
                cli.parallel_pages
            } else {
                self.parallel_pages.unwrap_or(cli.parallel_pages)
            },
            rate_limit: cli.rate_limit.or(self.rate_limit),
            skip_link_check: if cli.skip_link_check {
                cli.skip_link_check
            } else {
                self.skip_link_check.unwrap_or(cli.skip_link_check)
            },
            tokenizer: if cli.tokenizer != DEFAULT_TOKENIZER {
                cli.tokenizer.clone()
            } else {
                self.tokenizer.clone().unwrap_or_else(|| cli.tokenizer.clone())
            },
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            config: cli.config.clone(),
        }
    }
}
