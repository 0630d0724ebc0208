use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::Cli;
use crate::data::loader::LoadOptions;

/// Runtime settings. Every field has a default; a TOML file may set any
/// subset and command-line flags win over both.
///
/// ```toml
/// delimiter = ","
/// dataset = "data/top10s.csv"
/// top_n = 5
/// max_rows = 200000
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub delimiter: char,
    /// Fallback dataset used when no file is given.
    pub dataset: PathBuf,
    pub top_n: usize,
    pub max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: ';',
            dataset: PathBuf::from("Spotify.csv"),
            top_n: 10,
            max_rows: 1_000_000,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("parsing config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, then the `--config` file if any, then individual flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(file) = &cli.file {
            config.dataset = file.clone();
        }
        if let Some(delimiter) = cli.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(max_rows) = cli.max_rows {
            config.max_rows = max_rows;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || self.delimiter == '\n' || self.delimiter == '"' {
            bail!(
                "delimiter must be a single ASCII character other than newline or quote, got {:?}",
                self.delimiter
            );
        }
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        if self.max_rows == 0 {
            bail!("max_rows must be at least 1");
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            // validate() guarantees ASCII
            delimiter: self.delimiter as u8,
            max_rows: self.max_rows,
        }
    }
}
