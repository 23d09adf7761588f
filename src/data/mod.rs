/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file, normalize headers → MedalTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  registry of options, selections → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────┐
///   │ metrics / aggregate  │  headline numbers + five chart queries
///   └──────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view   │  compute_view(): the whole refresh as one pure call
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod view;
