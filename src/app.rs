use std::io::Write;

use anyhow::Result;
use log::debug;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::{Commands, OptionsArgs, OutputFormat, RecommendArgs};
use crate::config::Config;
use crate::data::filter::{FilterCriteria, FilterOptions};
use crate::data::loader::load_file;
use crate::data::similarity::Recommendation;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One line of the response table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub title: String,
    pub artist: String,
    #[serde(rename = "top genre")]
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub popularity: Option<f64>,
    pub similarity: f64,
}

impl From<&Recommendation> for ResultRow {
    fn from(rec: &Recommendation) -> Self {
        let track = &rec.track;
        ResultRow {
            title: track.title().to_string(),
            artist: track.artist().to_string(),
            genre: track.genre().map(str::to_string),
            year: track.year(),
            popularity: track.popularity(),
            similarity: rec.score,
        }
    }
}

#[derive(Tabled)]
struct ResultCells {
    title: String,
    artist: String,
    #[tabled(rename = "top genre")]
    genre: String,
    year: String,
    popularity: String,
    similarity: String,
}

impl From<&ResultRow> for ResultCells {
    fn from(row: &ResultRow) -> Self {
        ResultCells {
            title: row.title.clone(),
            artist: row.artist.clone(),
            genre: row.genre.clone().unwrap_or_default(),
            year: row.year.map(|y| y.to_string()).unwrap_or_default(),
            popularity: row.popularity.map(|p| p.to_string()).unwrap_or_default(),
            similarity: format!("{:.4}", row.similarity),
        }
    }
}

#[derive(Debug, Serialize)]
struct OptionsReport<'a> {
    #[serde(flatten)]
    options: &'a FilterOptions,
    titles: Vec<&'a str>,
}

// ---------------------------------------------------------------------------
// Command runner
// ---------------------------------------------------------------------------

/// Executes one command end to end. Every call loads its own dataset, so
/// nothing is shared between invocations.
pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run<W: Write>(&self, command: &Commands, out: &mut W) -> Result<()> {
        match command {
            Commands::Options(args) => self.options(args, out),
            Commands::Recommend(args) => self.recommend(args, out),
        }
    }

    fn session(&self, filters: FilterCriteria, top_n: usize) -> Result<Session> {
        debug!("Using config {:?}", self.config);
        let dataset = load_file(&self.config.dataset, &self.config.load_options())?;
        let mut session = Session::new(dataset, top_n);
        session.set_filters(filters);
        Ok(session)
    }

    fn options<W: Write>(&self, args: &OptionsArgs, out: &mut W) -> Result<()> {
        let session = self.session(FilterCriteria::from(&args.filters), self.config.top_n)?;
        let options = session.options();
        let titles = session.selectable_titles();

        match args.format {
            OutputFormat::Json => {
                let report = OptionsReport {
                    options: &options,
                    titles,
                };
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            }
            OutputFormat::Table => {
                let years: Vec<String> = options.years.iter().map(i64::to_string).collect();
                writeln!(out, "Years:  All, {}", years.join(", "))?;
                writeln!(out, "Genres: All, {}", options.genres.join(", "))?;
                writeln!(out, "Songs ({}):", titles.len())?;
                for title in titles {
                    writeln!(out, "  {title}")?;
                }
            }
        }
        Ok(())
    }

    fn recommend<W: Write>(&self, args: &RecommendArgs, out: &mut W) -> Result<()> {
        let top_n = args.top.unwrap_or(self.config.top_n);
        let mut session = self.session(FilterCriteria::from(&args.filters), top_n)?;
        let recommendations = session.recommend(&args.title)?;
        let rows: Vec<ResultRow> = recommendations.iter().map(ResultRow::from).collect();

        match args.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &rows)?;
                writeln!(out)?;
            }
            OutputFormat::Table => {
                if let Some(status) = &session.status_message {
                    writeln!(out, "{status}")?;
                }
                if !rows.is_empty() {
                    let cells: Vec<ResultCells> = rows.iter().map(ResultCells::from).collect();
                    writeln!(out, "{}", Table::new(cells))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FilterArgs;
    use crate::data::model::{CellValue, Track};

    fn write_dataset(dir: &tempfile::TempDir) -> Config {
        let path = dir.path().join("songs.csv");
        std::fs::write(
            &path,
            "title;artist;top genre;year;bpm;energy;danceability ;dB;liveness;valence;duration;acousticness;speechiness ;popularity\n\
             Alpha;a1;pop;2010;120;80;70;-5;10;60;200;10;5;70\n\
             Beta;a2;pop;2011;100;50;40;-9;30;20;240;60;9;40\n\
             Gamma;a3;;2010;118;78;69;-5;12;58;205;12;5;68\n",
        )
        .unwrap();
        Config {
            dataset: path,
            ..Config::default()
        }
    }

    #[test]
    fn result_row_reads_display_columns() {
        let track = Track {
            row: 0,
            fields: [
                ("title", CellValue::String("Alpha".into())),
                ("artist", CellValue::String("a1".into())),
                ("year", CellValue::Integer(2010)),
                ("popularity", CellValue::Integer(70)),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        };
        let row = ResultRow::from(&Recommendation { track, score: 0.5 });
        assert_eq!(row.genre, None);
        assert_eq!(row.popularity, Some(70.0));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["top genre"], serde_json::Value::Null);
        assert_eq!(json["similarity"], 0.5);
    }

    #[test]
    fn recommend_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(write_dataset(&dir));
        let args = RecommendArgs {
            title: "Alpha".into(),
            filters: FilterArgs::default(),
            top: None,
            format: OutputFormat::Json,
        };
        let mut out = Vec::new();
        app.run(&Commands::Recommend(args), &mut out).unwrap();
        let rows: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let titles: Vec<&str> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Gamma", "Beta"]);
    }

    #[test]
    fn recommend_table_output_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(write_dataset(&dir));
        let args = RecommendArgs {
            title: "Beta".into(),
            filters: FilterArgs::default(),
            top: Some(1),
            format: OutputFormat::Table,
        };
        let mut out = Vec::new();
        app.run(&Commands::Recommend(args), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("top genre"), "{text}");
        assert!(text.contains("similarity"), "{text}");
        assert!(!text.contains("| Beta"), "{text}");
    }

    #[test]
    fn options_respect_filters() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(write_dataset(&dir));
        let args = OptionsArgs {
            filters: FilterArgs {
                year: Some(2010),
                genre: None,
            },
            format: OutputFormat::Json,
        };
        let mut out = Vec::new();
        app.run(&Commands::Options(args), &mut out).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["years"], serde_json::json!([2010, 2011]));
        assert_eq!(report["genres"], serde_json::json!(["pop"]));
        assert_eq!(report["titles"], serde_json::json!(["Alpha", "Gamma"]));
    }

    #[test]
    fn domain_errors_surface_typed() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(write_dataset(&dir));
        let args = RecommendArgs {
            title: "Alpha".into(),
            filters: FilterArgs {
                year: Some(2015),
                genre: None,
            },
            top: None,
            format: OutputFormat::Table,
        };
        let err = app
            .run(&Commands::Recommend(args), &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::error::RecommendError>(),
            Some(&crate::error::RecommendError::EmptySelection)
        );
    }
}
