//! Cosine ranking of tracks against a reference track.
//!
//! All scores lie in [-1.0, 1.0]. A zero-norm vector has no direction, so
//! its similarity with anything, itself included, is 0.0.

use std::cmp::Ordering;

use log::debug;

use super::features::{FeatureMatrix, FeatureVector};
use super::model::{Dataset, Track};
use crate::error::{RecommendError, Result};

/// One ranked track.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub track: Track,
    pub score: f64,
}

/// Cosine of the angle between `a` and `b`.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // Rounding can push identical directions a hair past 1.0.
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Index of the first track whose title equals `title`, in dataset order.
pub fn reference_index(dataset: &Dataset, title: &str) -> Option<usize> {
    dataset.tracks.iter().position(|t| t.has_title(title))
}

/// Similarity of every row against row `reference`, row-aligned.
pub fn score_all(matrix: &FeatureMatrix, reference: usize) -> Result<Vec<f64>> {
    let anchor = matrix.rows.get(reference).ok_or_else(|| {
        RecommendError::Computation(format!(
            "reference row {reference} outside a matrix of {} rows",
            matrix.len()
        ))
    })?;
    let scores: Vec<f64> = matrix
        .rows
        .iter()
        .map(|row| cosine_similarity(anchor, row))
        .collect();
    if let Some(pos) = scores.iter().position(|s| !s.is_finite()) {
        return Err(RecommendError::Computation(format!(
            "non-finite similarity for row {pos}"
        )));
    }
    Ok(scores)
}

/// Every track paired with its score, best first. Equal scores keep dataset order.
pub fn rank_all(
    dataset: &Dataset,
    matrix: &FeatureMatrix,
    reference: usize,
) -> Result<Vec<Recommendation>> {
    if dataset.len() != matrix.len() {
        return Err(RecommendError::Computation(format!(
            "feature matrix has {} rows but dataset has {}",
            matrix.len(),
            dataset.len()
        )));
    }
    let scores = score_all(matrix, reference)?;
    let mut ranked: Vec<Recommendation> = dataset
        .tracks
        .iter()
        .zip(scores)
        .map(|(track, score)| Recommendation {
            track: track.clone(),
            score,
        })
        .collect();
    // Scores are finite here; sort_by is stable so ties keep dataset order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ok(ranked)
}

/// Rank against the first track titled `title`, drop every track carrying
/// that title, and keep at most `top_n`.
pub fn recommend(
    dataset: &Dataset,
    matrix: &FeatureMatrix,
    title: &str,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    let reference = reference_index(dataset, title)
        .ok_or_else(|| RecommendError::NotFound(title.to_string()))?;
    debug!(
        "Reference '{title}' is row {} of {}",
        dataset.tracks[reference].row,
        dataset.len()
    );

    let ranked = rank_all(dataset, matrix, reference)?;
    Ok(exclude_and_truncate(ranked, title, top_n))
}

/// Drop every entry titled `title` (not just the reference row) and keep
/// the first `top_n` of what remains.
pub fn exclude_and_truncate(
    ranked: Vec<Recommendation>,
    title: &str,
    top_n: usize,
) -> Vec<Recommendation> {
    ranked
        .into_iter()
        .filter(|r| !r.track.has_title(title))
        .take(top_n)
        .collect()
}
