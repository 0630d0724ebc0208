use serde::Serialize;

use super::model::{CellValue, Dataset, GENRE_COLUMN, Track, YEAR_COLUMN};

// ---------------------------------------------------------------------------
// Filter predicate: optional equality constraints
// ---------------------------------------------------------------------------

/// Equality constraints on the categorical columns. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: Option<i64>,
    pub genre: Option<String>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.year.is_none() && self.genre.is_none()
    }

    /// A track passes when it satisfies every specified constraint.
    ///
    /// * `year` compares against the integer `year` cell; a missing or
    ///   non-integer cell never matches.
    /// * `genre` compares exactly against the `top genre` text; a null
    ///   genre never matches.
    pub fn matches(&self, track: &Track) -> bool {
        if let Some(year) = self.year {
            if track.get(YEAR_COLUMN) != Some(&CellValue::Integer(year)) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if track.genre() != Some(genre.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Return indices of tracks that pass all active constraints, in row order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| criteria.matches(track))
        .map(|(i, _)| i)
        .collect()
}

/// Build the filtered subset as a new dataset. The header is kept even when
/// no rows survive, so schema checks still see every column.
pub fn apply_filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    if criteria.is_unconstrained() {
        return dataset.clone();
    }
    let tracks = filtered_indices(dataset, criteria)
        .into_iter()
        .map(|i| dataset.tracks[i].clone())
        .collect();
    Dataset::from_tracks(dataset.column_names.clone(), tracks)
}

// ---------------------------------------------------------------------------
// Selectable values
// ---------------------------------------------------------------------------

/// Distinct values a caller may offer as constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct integer years, ascending.
    pub years: Vec<i64>,
    /// Distinct non-null genres, sorted.
    pub genres: Vec<String>,
}

pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    // unique_values is a BTreeSet, so both lists come out sorted.
    let years = dataset
        .unique_values
        .get(YEAR_COLUMN)
        .map(|vals| {
            vals.iter()
                .filter_map(|v| match v {
                    CellValue::Integer(y) => Some(*y),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    let genres = dataset
        .unique_values
        .get(GENRE_COLUMN)
        .map(|vals| {
            vals.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    FilterOptions { years, genres }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{LoadOptions, load_reader};

    fn sample() -> Dataset {
        let text = "title;top genre;year\n\
                    A;pop;2010\n\
                    B;dance pop;2011\n\
                    C;pop;2011\n\
                    D;;2010\n";
        load_reader(text.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn unconstrained_passes_everything() {
        let ds = sample();
        let out = apply_filter(&ds, &FilterCriteria::default());
        assert_eq!(out, ds);
    }

    #[test]
    fn year_and_genre_combine() {
        let ds = sample();
        let criteria = FilterCriteria {
            year: Some(2011),
            genre: Some("pop".into()),
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![2]);
        assert_eq!(apply_filter(&ds, &criteria).titles(), vec!["C"]);
    }

    #[test]
    fn null_genre_never_matches_a_genre_constraint() {
        let ds = sample();
        let criteria = FilterCriteria {
            year: Some(2010),
            genre: Some("pop".into()),
        };
        assert_eq!(apply_filter(&ds, &criteria).titles(), vec!["A"]);
    }

    #[test]
    fn no_match_keeps_header() {
        let ds = sample();
        let criteria = FilterCriteria {
            year: Some(2015),
            genre: None,
        };
        let out = apply_filter(&ds, &criteria);
        assert!(out.is_empty());
        assert_eq!(out.column_names, ds.column_names);
    }

    #[test]
    fn options_are_sorted_and_skip_nulls() {
        let opts = filter_options(&sample());
        assert_eq!(opts.years, vec![2010, 2011]);
        assert_eq!(opts.genres, vec!["dance pop".to_string(), "pop".to_string()]);
    }
}
