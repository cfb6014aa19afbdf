//! Suffix array indexing module
//!
//! This module provides O(m log n) exact phrase lookup over an
//! integer-coded corpus using suffix arrays.
//!
//! ## Architecture
//!
//! - `builder`: Encodes sentences and sorts their suffixes
//! - `search`: The queryable [`SuffixArray`] and its bounded binary search
//! - `writer`: Persists an index to disk
//! - `reader`: Memory-mapped loading
//! - `types`: File layout and metadata
//!
//! ## File Format
//!
//! Per index directory, five files are created:
//! - `vocab.json`: Token strings in id order
//! - `corpus.bin`: Token ids of all sentences, concatenated
//! - `sentences.bin`: Start offset of each sentence in corpus.bin
//! - `sa.bin`: The sorted suffix array (positions into corpus.bin)
//! - `meta.json`: Counts and format version

pub mod builder;
pub mod reader;
pub mod search;
pub mod types;
pub mod writer;

// Re-exports for convenience
pub use builder::{BuiltIndex, IndexBuilder};
pub use reader::{IndexReader, IndexStats};
pub use search::SuffixArray;
pub use types::{IndexMeta, MAX_COMPARISON_LENGTH};
pub use writer::IndexWriter;
