//! Suffix-array index over an integer-coded corpus
//!
//! - [`suffix_array`]: building, persisting, loading and searching
//! - [`frequent`]: frequent contiguous phrases and cache warming
//! - [`stats`]: index statistics for the command line

pub mod frequent;
pub mod stats;
pub mod suffix_array;

pub use frequent::FrequentPhrases;
pub use suffix_array::{BuiltIndex, IndexBuilder, IndexMeta, IndexReader, IndexStats, IndexWriter, SuffixArray};
