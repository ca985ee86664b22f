/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FilterDomain  │  distinct values per dimension
///   └──────────────┘
///        │
///        ▼
///   ┌─────────────┐   user input
///   │ FilterStore  │ ◀──────────── update / toggle / select_all
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selection → FilteredView (indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + one series per chart
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
