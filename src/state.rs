use log::{debug, info};

use crate::data::features::standardize;
use crate::data::filter::{FilterCriteria, FilterOptions, apply_filter, filter_options};
use crate::data::model::Dataset;
use crate::data::similarity::{Recommendation, exclude_and_truncate, rank_all};
use crate::data::validate::validate;
use crate::error::{ErrorKind, Result};

// ---------------------------------------------------------------------------
// Recommend state machine
// ---------------------------------------------------------------------------

/// Where a recommend action currently stands.
///
/// `Idle → Validating → Ranking → Done`, or `Validating | Ranking → Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Ranking,
    Done,
    Failed(ErrorKind),
}

// ---------------------------------------------------------------------------
// Request-scoped session
// ---------------------------------------------------------------------------

/// Everything one request works on. Built per request and dropped with it,
/// so the filtered subset and its statistics are never shared.
#[derive(Debug)]
pub struct Session {
    /// The dataset as loaded.
    pub dataset: Dataset,

    /// Active year / genre constraints.
    pub filters: FilterCriteria,

    /// Rows passing `filters`, in file order.
    pub filtered: Dataset,

    /// How many recommendations to return.
    pub top_n: usize,

    /// State of the last recommend action.
    pub phase: Phase,

    /// Every phase entered by the last recommend action, in order.
    pub trace: Vec<Phase>,

    /// Human-readable outcome of the last recommend action.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(dataset: Dataset, top_n: usize) -> Self {
        let filtered = dataset.clone();
        Self {
            dataset,
            filters: FilterCriteria::default(),
            filtered,
            top_n,
            phase: Phase::Idle,
            trace: Vec::new(),
            status_message: None,
        }
    }

    /// Replace the constraints and recompute the filtered subset.
    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
        self.refilter();
    }

    pub fn refilter(&mut self) {
        self.filtered = apply_filter(&self.dataset, &self.filters);
        debug!(
            "Filters {:?} keep {} of {} rows",
            self.filters,
            self.filtered.len(),
            self.dataset.len()
        );
    }

    /// Values offered for the year / genre constraints.
    pub fn options(&self) -> FilterOptions {
        filter_options(&self.dataset)
    }

    /// Titles that can currently be selected, in filtered order.
    pub fn selectable_titles(&self) -> Vec<&str> {
        self.filtered.titles()
    }

    fn enter(&mut self, phase: Phase) {
        debug!("recommend: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.trace.push(phase);
    }

    /// Run the recommend action for `title` over the filtered subset.
    ///
    /// Validation happens before any feature is read; a failure there
    /// never builds the feature matrix.
    pub fn recommend(&mut self, title: &str) -> Result<Vec<Recommendation>> {
        self.phase = Phase::Idle;
        self.trace.clear();
        self.status_message = None;

        match self.run(title) {
            Ok(result) => {
                self.enter(Phase::Done);
                info!("Recommended {} tracks for '{title}'", result.len());
                self.status_message = Some(format!(
                    "Top {} recommendations for '{title}'",
                    result.len()
                ));
                Ok(result)
            }
            Err(err) => {
                self.enter(Phase::Failed(err.kind()));
                self.status_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn run(&mut self, title: &str) -> Result<Vec<Recommendation>> {
        self.enter(Phase::Validating);
        let reference = validate(&self.filtered, title)?;

        self.enter(Phase::Ranking);
        let matrix = standardize(&self.filtered)?;
        let ranked = rank_all(&self.filtered, &matrix, reference)?;

        Ok(exclude_and_truncate(ranked, title, self.top_n))
    }
}
