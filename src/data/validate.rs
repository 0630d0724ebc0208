use super::features::check_features;
use super::model::{ARTIST_COLUMN, Dataset, GENRE_COLUMN, TITLE_COLUMN, YEAR_COLUMN};
use super::similarity::reference_index;
use crate::error::{RecommendError, Result};

/// Columns the result table is built from, besides the features.
pub const DISPLAY_COLUMNS: [&str; 4] = [TITLE_COLUMN, ARTIST_COLUMN, GENRE_COLUMN, YEAR_COLUMN];

pub fn check_columns(dataset: &Dataset) -> Result<()> {
    let missing: Vec<String> = DISPLAY_COLUMNS
        .iter()
        .filter(|name| !dataset.has_column(name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecommendError::MissingColumns(missing))
    }
}

/// Preconditions of a recommend request, checked in order before any
/// numeric work:
///
/// 1. the filtered dataset has at least one row,
/// 2. every display and feature column is present,
/// 3. some row carries the selected title.
///
/// Returns the index of the reference row (first match in dataset order).
pub fn validate(filtered: &Dataset, title: &str) -> Result<usize> {
    if filtered.is_empty() {
        return Err(RecommendError::EmptySelection);
    }
    check_columns(filtered)?;
    check_features(filtered)?;
    reference_index(filtered, title).ok_or_else(|| RecommendError::NotFound(title.to_string()))
}
