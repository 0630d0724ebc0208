use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Could not load dataset: {0}")]
    Load(String),

    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Dataset is missing required feature columns: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("Feature '{column}' in row {row} is not numeric: '{value}'")]
    NonNumericFeature {
        row: usize,
        column: String,
        value: String,
    },

    #[error("No songs match the selected filters")]
    EmptySelection,

    #[error("Song not found in the filtered dataset: {0}")]
    NotFound(String),

    #[error("Similarity computation failed: {0}")]
    Computation(String),

    #[error("Dataset has more than {limit} rows")]
    Resource { limit: usize },
}

/// The user-facing category of a [`RecommendError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Schema,
    EmptySelection,
    NotFound,
    Computation,
    Resource,
}

impl RecommendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecommendError::Load(_) => ErrorKind::Load,
            RecommendError::MissingColumns(_)
            | RecommendError::MissingFeatures(_)
            | RecommendError::NonNumericFeature { .. } => ErrorKind::Schema,
            RecommendError::EmptySelection => ErrorKind::EmptySelection,
            RecommendError::NotFound(_) => ErrorKind::NotFound,
            RecommendError::Computation(_) => ErrorKind::Computation,
            RecommendError::Resource { .. } => ErrorKind::Resource,
        }
    }
}

impl ErrorKind {
    /// Process exit code reported by the binary for this kind.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Load => 2,
            ErrorKind::Schema => 3,
            ErrorKind::EmptySelection => 4,
            ErrorKind::NotFound => 5,
            ErrorKind::Computation => 6,
            ErrorKind::Resource => 7,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Load => "LoadError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::EmptySelection => "EmptySelectionError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Computation => "ComputationError",
            ErrorKind::Resource => "ResourceError",
        };
        f.write_str(name)
    }
}
