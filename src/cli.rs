use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::data::filter::FilterCriteria;

#[derive(Parser, Debug)]
#[command(name = "tunematch")]
#[command(about = "Recommend similar songs from a tabular music dataset")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file (delimiter, dataset, top_n, max_rows)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset to read; defaults to the configured fallback file
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Field delimiter of the dataset
    #[arg(short, long, global = true)]
    pub delimiter: Option<char>,

    /// Refuse datasets with more rows than this
    #[arg(long, global = true)]
    pub max_rows: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List filter values and the titles that remain selectable
    Options(OptionsArgs),

    /// Rank the songs most similar to a selected title
    Recommend(RecommendArgs),
}

/// Optional equality constraints; omitting one means "All".
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only songs from this year
    #[arg(long)]
    pub year: Option<i64>,

    /// Keep only songs of this top genre (exact match)
    #[arg(long)]
    pub genre: Option<String>,
}

impl From<&FilterArgs> for FilterCriteria {
    fn from(args: &FilterArgs) -> Self {
        FilterCriteria {
            year: args.year,
            genre: args.genre.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Title of the song you like
    pub title: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of recommendations, at least 1 (overrides the config)
    #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
