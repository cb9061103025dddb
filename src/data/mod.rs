/// Data layer: the matrix type and its text loader.
///
/// ```text
///   data.txt / mask.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  whitespace-delimited text → Matrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model   │  Matrix: mask product, log transform, finite range
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
