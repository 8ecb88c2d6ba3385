use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::dates::{DateExtractor, DEFAULT_DATE_PATTERNS};
use crate::errors::AppError;
use crate::text::HEADING_OFFSET;

/// Upper bound for `concurrent_lines`
pub const MAX_CONCURRENT_LINES: usize = 64;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and overriding configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding one subdirectory per publication line
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving merged volumes
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How issues within a publication line are ordered before packing
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueOrder {
    // @order: Lexicographic filename order only
    Filename,
    // @order: Publication date when every issue has one, filename otherwise
    #[default]
    Date,
}

impl std::fmt::Display for IssueOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filename => write!(f, "filename"),
            Self::Date => write!(f, "date"),
        }
    }
}

impl std::str::FromStr for IssueOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "filename" => Ok(Self::Filename),
            "date" => Ok(Self::Date),
            _ => Err(anyhow!("Invalid issue order: {}", s)),
        }
    }
}

/// Settings consumed by the merge engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    /// Word-count ceiling per volume (soft: a single oversized issue is kept whole)
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Restrict the run to a single publication line
    #[serde(default)]
    pub magazine: Option<String>,

    /// Extension of issue files inside a line directory
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Filename date patterns, tried in order; each needs year, month and day groups
    #[serde(default = "default_date_patterns")]
    pub date_patterns: Vec<String>,

    /// Ordering of issues within a line
    #[serde(default)]
    pub issue_order: IssueOrder,

    /// Levels each embedded heading is demoted by
    #[serde(default = "default_heading_offset")]
    pub heading_offset: usize,

    /// Number of publication lines merged at once
    #[serde(default = "default_concurrent_lines")]
    pub concurrent_lines: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            magazine: None,
            extension: default_extension(),
            date_patterns: default_date_patterns(),
            issue_order: IssueOrder::default(),
            heading_offset: default_heading_offset(),
            concurrent_lines: default_concurrent_lines(),
        }
    }
}

impl MergeConfig {
    /// Compile the configured date patterns
    pub fn date_extractor(&self) -> Result<DateExtractor> {
        DateExtractor::new(&self.date_patterns).context("Invalid date pattern in configuration")
    }

    /// Extension without a leading dot
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("converted_md")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("merged_magazines")
}

fn default_max_words() -> usize {
    500_000
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_date_patterns() -> Vec<String> {
    DEFAULT_DATE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_heading_offset() -> usize {
    HEADING_OFFSET
}

fn default_concurrent_lines() -> usize {
    1 // strictly sequential, one line after another
}

impl Config {
    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.merge.max_words == 0 {
            return Err(AppError::Config("max_words must be greater than zero".to_string()));
        }

        if self.merge.concurrent_lines == 0 || self.merge.concurrent_lines > MAX_CONCURRENT_LINES {
            return Err(AppError::Config(format!(
                "concurrent_lines must be between 1 and {}, got {}",
                MAX_CONCURRENT_LINES, self.merge.concurrent_lines
            )));
        }

        if self.merge.normalized_extension().is_empty() {
            return Err(AppError::Config("Issue file extension must not be empty".to_string()));
        }

        if self.merge.date_patterns.is_empty() {
            return Err(AppError::Config("At least one date pattern is required".to_string()));
        }

        if let Some(magazine) = &self.merge.magazine {
            if magazine.trim().is_empty() || magazine.contains(['/', '\\']) {
                return Err(AppError::Config(format!("Invalid magazine name: '{}'", magazine)));
            }
        }

        DateExtractor::new(&self.merge.date_patterns)?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            merge: MergeConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
