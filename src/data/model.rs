use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TITLE_COLUMN: &str = "title";
pub const ARTIST_COLUMN: &str = "artist";
pub const GENRE_COLUMN: &str = "top genre";
pub const YEAR_COLUMN: &str = "year";
pub const POPULARITY_COLUMN: &str = "popularity";

/// Columns kept verbatim as text: never type-guessed, so a title such as
/// `1999` still compares as a string.
pub const TEXT_COLUMNS: [&str; 3] = [TITLE_COLUMN, ARTIST_COLUMN, GENRE_COLUMN];

// ---------------------------------------------------------------------------
// CellValue – a single cell in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, guessed from the delimited text.
/// Used in `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Text is parsed after trimming so
    /// that a feature column exported as strings is still usable.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Track – one row of the table
// ---------------------------------------------------------------------------

/// A single track (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Position of the row in the file, zero-based, header excluded.
    pub row: usize,
    /// Dynamic columns: column_name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl Track {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// The selection identifier. Not unique across a dataset.
    pub fn title(&self) -> &str {
        self.text(TITLE_COLUMN).unwrap_or("")
    }

    /// Whether this track carries exactly `title`. A null title matches nothing.
    pub fn has_title(&self, title: &str) -> bool {
        self.text(TITLE_COLUMN) == Some(title)
    }

    pub fn artist(&self) -> &str {
        self.text(ARTIST_COLUMN).unwrap_or("")
    }

    pub fn genre(&self) -> Option<&str> {
        self.text(GENRE_COLUMN)
    }

    pub fn year(&self) -> Option<i64> {
        match self.fields.get(YEAR_COLUMN)? {
            CellValue::Integer(y) => Some(*y),
            _ => None,
        }
    }

    pub fn popularity(&self) -> Option<f64> {
        self.fields.get(POPULARITY_COLUMN).and_then(CellValue::as_f64)
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(CellValue::as_str)
    }
}

// ---------------------------------------------------------------------------
// Dataset – an ordered table of tracks
// ---------------------------------------------------------------------------

/// A loaded (or filtered) table with pre-computed column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All tracks (rows), in file order.
    pub tracks: Vec<Track>,
    /// Trimmed column names in header order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build column indices from the given header and tracks.
    pub fn from_tracks(column_names: Vec<String>, tracks: Vec<Track>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for track in &tracks {
            for (col, val) in &track.fields {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        Dataset {
            tracks,
            column_names,
            unique_values,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Titles in row order, duplicates included.
    pub fn titles(&self) -> Vec<&str> {
        self.tracks.iter().map(Track::title).collect()
    }
}
