/// Data layer: parsing, cleaning, and typing of uploaded files.
///
/// Architecture:
/// ```text
///  .txt / .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  skip to BEGIN RECORD, tolerant CSV parse → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop empty rows, drop SDI rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  datetime column, numeric columns, sort → Dataset
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
pub mod schema;
