//! Song recommendations from a tabular music dataset.
//!
//! A request loads a delimited table, narrows it with optional year / genre
//! constraints, standardizes ten audio features over what remains and ranks
//! every row by cosine similarity to a selected title.
//!
//! ```no_run
//! use std::path::Path;
//! use tunematch::{FilterCriteria, LoadOptions, Session, load_file};
//!
//! let dataset = load_file(Path::new("Spotify.csv"), &LoadOptions::default())?;
//! let mut session = Session::new(dataset, 10);
//! session.set_filters(FilterCriteria { year: Some(2015), genre: None });
//! for rec in session.recommend("Hello")? {
//!     println!("{} ({:.3})", rec.track.title(), rec.score);
//! }
//! # Ok::<(), tunematch::RecommendError>(())
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use data::filter::FilterCriteria;
pub use data::loader::{LoadOptions, load_file, load_reader};
pub use data::model::{CellValue, Dataset, Track};
pub use data::similarity::Recommendation;
pub use error::{ErrorKind, RecommendError, Result};
pub use state::{Phase, Session};
