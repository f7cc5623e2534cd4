//! Data layer: loading, cleaning, caching, aggregation and filtering.
//!
//! Architecture:
//! ```text
//!  SGJobData.csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ cleaner   │  prune, validate, explode categories → JobTable
//!   └──────────┘
//!        │  (cache: cleaned .csv / .parquet, read back on the next start)
//!        ▼
//!   ┌──────────┐      ┌──────────┐
//!   │  filter   │ ───▶ │  stats    │  per-category and per-view numbers
//!   └──────────┘      └──────────┘
//! ```
//!
//! Nothing here knows about the UI; the dashboard only consumes
//! [`model::JobTable`], [`filter::FilterSpec`] and the functions in [`stats`].

pub mod cache;
pub mod cleaner;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
