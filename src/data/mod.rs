//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RecordSet
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ RecordSet │  Vec<Record>, year bounds, unique industries/countries
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection predicates → filtered indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ pipeline  │  KPIs + chart series → PipelineResult
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod stats;

pub use error::DataError;
pub use filter::FilterSelection;
pub use model::{Record, RecordSet};
pub use pipeline::{PipelineResult, compute};
