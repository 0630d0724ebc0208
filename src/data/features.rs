//! Feature extraction and per-column standardization.
//!
//! Statistics are always fitted on the dataset handed in, which in the
//! recommend pipeline is the *filtered* subset, never the full file.

use log::{debug, warn};

use super::model::Dataset;
use crate::error::{RecommendError, Result};

/// The audio features compared between tracks, in vector order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "bpm",
    "energy",
    "danceability",
    "dB",
    "liveness",
    "valence",
    "duration",
    "acousticness",
    "speechiness",
    "popularity",
];

pub const FEATURE_COUNT: usize = 10;

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Names from [`FEATURE_COLUMNS`] absent from the dataset header, in feature order.
pub fn missing_features(dataset: &Dataset) -> Vec<String> {
    FEATURE_COLUMNS
        .iter()
        .filter(|name| !dataset.has_column(name))
        .map(|name| name.to_string())
        .collect()
}

/// Fails with every missing feature name, not just the first.
pub fn check_features(dataset: &Dataset) -> Result<()> {
    let missing = missing_features(dataset);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecommendError::MissingFeatures(missing))
    }
}

/// Raw (unscaled) feature vectors, one per track, in row order.
pub fn extract_features(dataset: &Dataset) -> Result<Vec<FeatureVector>> {
    check_features(dataset)?;
    dataset
        .tracks
        .iter()
        .map(|track| -> Result<FeatureVector> {
            let mut vector = [0.0; FEATURE_COUNT];
            for (slot, column) in vector.iter_mut().zip(FEATURE_COLUMNS) {
                let cell = track.get(column);
                *slot = cell
                    .and_then(|c| c.as_f64())
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| RecommendError::NonNumericFeature {
                        row: track.row,
                        column: column.to_string(),
                        value: cell.map(|c| c.to_string()).unwrap_or_default(),
                    })?;
            }
            Ok(vector)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scaler
// ---------------------------------------------------------------------------

/// Per-column mean and population standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    pub mean: FeatureVector,
    pub std: FeatureVector,
    /// Columns whose variance is within rounding error of zero.
    pub constant: [bool; FEATURE_COUNT],
}

/// A column is constant when `var <= n*eps*var + (n*mean*eps)^2`, i.e. when
/// the computed variance is no larger than what summing `n` identical values
/// can leave behind through rounding.
fn is_rounding_noise(var: f64, mean: f64, n: f64) -> bool {
    let eps = f64::EPSILON;
    let bound = n * eps * var + (n * mean * eps).powi(2);
    var <= bound
}

impl Scaler {
    pub fn is_constant(&self, col: usize) -> bool {
        self.constant[col]
    }

    /// `(value - mean) / std`, with constant columns mapped to 0.0.
    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (col, slot) in out.iter_mut().enumerate() {
            if !self.is_constant(col) {
                *slot = (row[col] - self.mean[col]) / self.std[col];
            }
        }
        out
    }

    pub fn constant_columns(&self) -> Vec<&'static str> {
        (0..FEATURE_COUNT)
            .filter(|&col| self.is_constant(col))
            .map(|col| FEATURE_COLUMNS[col])
            .collect()
    }
}

pub fn fit_scaler(rows: &[FeatureVector]) -> Result<Scaler> {
    if rows.is_empty() {
        return Err(RecommendError::Computation(
            "cannot fit feature statistics on zero rows".into(),
        ));
    }
    let n = rows.len() as f64;

    let mut mean = [0.0; FEATURE_COUNT];
    for row in rows {
        for (m, v) in mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in mean.iter_mut() {
        *m /= n;
    }

    let mut var = [0.0; FEATURE_COUNT];
    for row in rows {
        for col in 0..FEATURE_COUNT {
            let d = row[col] - mean[col];
            var[col] += d * d;
        }
    }
    let mut std = [0.0; FEATURE_COUNT];
    let mut constant = [false; FEATURE_COUNT];
    for col in 0..FEATURE_COUNT {
        var[col] /= n;
        std[col] = var[col].sqrt();
        constant[col] = is_rounding_noise(var[col], mean[col], n);
    }

    if mean.iter().chain(std.iter()).any(|v| !v.is_finite()) {
        return Err(RecommendError::Computation(
            "feature statistics overflowed".into(),
        ));
    }
    Ok(Scaler {
        mean,
        std,
        constant,
    })
}

// ---------------------------------------------------------------------------
// FeatureMatrix
// ---------------------------------------------------------------------------

/// Standardized feature vectors, row-aligned with the dataset they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub rows: Vec<FeatureVector>,
    pub scaler: Scaler,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract, fit and transform in one pass over `dataset`.
pub fn standardize(dataset: &Dataset) -> Result<FeatureMatrix> {
    let raw = extract_features(dataset)?;
    let scaler = fit_scaler(&raw)?;

    let constant = scaler.constant_columns();
    if !constant.is_empty() {
        warn!("Zero-variance feature columns standardized to 0: {constant:?}");
    }
    debug!("Standardized {} rows", raw.len());

    let rows = raw.iter().map(|row| scaler.transform(row)).collect();
    Ok(FeatureMatrix { rows, scaler })
}
