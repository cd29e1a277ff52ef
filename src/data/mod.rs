/// Data layer: core types, parsing, selection, and export.
///
/// Architecture:
/// ```text
///  .fasta / .fastq(.gz)        .tsv / .csv
///        │                          │
///        ▼                          ▼
///   ┌───────────┐            ┌──────────┐
///   │ reference │            │ metadata │   parse upload → model
///   └───────────┘            └──────────┘
///        │  ReferenceSet            │  MetadataTable
///        └────────────┬─────────────┘
///                     ▼
///               ┌──────────┐
///               │  filter  │   Selection → matching row indices
///               └──────────┘
///                     │
///                     ▼
///               ┌──────────┐
///               │  export  │   header + matching rows / FASTA / lengths
///               └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod metadata;
pub mod model;
pub mod reference;
