use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use log::{debug, info};

use super::model::{CellValue, Dataset, TEXT_COLUMNS, Track};
use crate::error::{RecommendError, Result};

/// How a delimited source is parsed.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Field delimiter byte, `;` by default.
    pub delimiter: u8,
    /// Loading fails with [`RecommendError::Resource`] past this many rows.
    pub max_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            max_rows: 1_000_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a delimited file on disk.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let outcome = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))
        .and_then(|file| {
            parse_delimited(file, options).with_context(|| format!("parsing {}", path.display()))
        });
    let dataset = outcome.map_err(into_recommend_error)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any byte stream, e.g. an uploaded file body.
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset> {
    let dataset = parse_delimited(reader, options).map_err(into_recommend_error)?;
    info!(
        "Loaded {} rows x {} columns from stream",
        dataset.len(),
        dataset.column_names.len()
    );
    Ok(dataset)
}

/// Typed errors raised inside the parser survive; everything else is a load failure.
fn into_recommend_error(err: anyhow::Error) -> RecommendError {
    match err.downcast::<RecommendError>() {
        Ok(typed) => typed,
        Err(other) => RecommendError::Load(format!("{other:#}")),
    }
}

// ---------------------------------------------------------------------------
// Delimited-text parser
// ---------------------------------------------------------------------------

/// Layout: one header row, then one track per row. Header names are trimmed
/// (including a leading byte-order mark) before anything looks them up.
fn parse_delimited<R: Read>(reader: R, options: &LoadOptions) -> anyhow::Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(normalize_column_name)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        bail!("input is empty");
    }

    let mut seen = BTreeSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            bail!("duplicate column '{name}' after trimming header names");
        }
    }
    debug!("Columns: {headers:?}");

    let mut tracks = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        if row_no >= options.max_rows {
            return Err(RecommendError::Resource {
                limit: options.max_rows,
            }
            .into());
        }
        let record = result.with_context(|| format!("row {row_no}"))?;

        let fields: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(name, raw)| (name.clone(), parse_cell(name, raw)))
            .collect();

        tracks.push(Track {
            row: row_no,
            fields,
        });
    }

    if tracks.is_empty() {
        bail!("input has a header row but no data rows");
    }

    Ok(Dataset::from_tracks(headers, tracks))
}

pub fn normalize_column_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_cell(column: &str, raw: &str) -> CellValue {
    if TEXT_COLUMNS.contains(&column) {
        if raw.is_empty() {
            CellValue::Null
        } else {
            CellValue::String(raw.to_string())
        }
    } else {
        guess_cell_type(raw)
    }
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(raw.to_string())
}
