/// Data layer: core types, loading, filtering, and ranking.
///
/// Architecture:
/// ```text
///  delimited text (.csv, `;` by default)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse stream → Dataset (trimmed header)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / genre equality → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  non-empty, columns present, title resolves
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  10 audio features → standardized FeatureMatrix
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ similarity  │  cosine vs. reference → ranked, excluded, top-N
///   └────────────┘
/// ```

pub mod features;
pub mod filter;
pub mod loader;
pub mod model;
pub mod similarity;
pub mod validate;
