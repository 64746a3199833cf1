/// Data layer: core types, loading, labeling, and filtering.
///
/// Architecture:
/// ```text
///  outputs/*.csv   ENIGH/<year>/*.csv
///        │                │
///        ▼                ▼
///   ┌──────────┐    ┌──────────┐
///   │  loader   │◄───│ explore   │  list years/tables, header, column subset
///   └──────────┘    └──────────┘
///        │  TableCache: (path, max_rows, columns) → Table | Absent
///        ▼
///   ┌──────────┐
///   │  enrich   │  sexo_jefe → sex_label, entidad → region_label (catalog)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  column = value selections, AND-ed → row subset
///   └──────────┘
///        │
///        ▼
///   summary (metrics, chart series)     export (CSV text)
/// ```

pub mod artifacts;
pub mod catalog;
pub mod enrich;
pub mod explore;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
