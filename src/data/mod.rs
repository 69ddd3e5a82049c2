/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TechDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ TechDataset  │  Vec<Record>, year / sector / country index
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  sector + year predicates → Vec<&Record>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group by country (and year) → means
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
