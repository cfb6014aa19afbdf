//! # hieromatch - suffix-array pattern matching for hierarchical phrases
//!
//! Given a tokenized corpus and an input sentence, hieromatch finds every
//! corpus occurrence of every pattern the sentence contains: contiguous
//! phrases such as `him and` as well as gapped patterns such as `it X him`,
//! where `X` stands for one or more corpus tokens.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`corpus`] - Vocabulary and the integer-coded corpus
//! - [`index`] - Suffix array building, persistence and lookup
//! - [`pattern`] - Patterns, occurrence sets and the shared pattern cache
//! - [`intersect`] - Occurrence sets of gapped patterns from their prefix and suffix
//! - [`tree`] - Prefix trees enumerating all patterns of a sentence
//! - [`output`] - Result formatting
//! - [`utils`] - Logging and progress reporting
//!
//! ## Quick Start
//!
//! ```no_run
//! use hieromatch::index::IndexReader;
//! use hieromatch::tree::{ExtractionConfig, PrefixTree};
//! use std::path::Path;
//!
//! let reader = IndexReader::open(Path::new("corpus.idx"), 100_000).unwrap();
//! let sentence = reader.vocab.encode_lenient("it makes him");
//!
//! let mut tree = PrefixTree::new(&reader.suffix_array, ExtractionConfig::default());
//! tree.add(&sentence).unwrap();
//!
//! for matched in tree.matched_patterns() {
//!     println!("{} {}", matched.pattern().display(&reader.vocab), matched.occurrences());
//! }
//! ```
//!
//! ## Performance
//!
//! Contiguous phrases are found by binary search within their parent's
//! suffix-array range. Gapped patterns never touch the corpus: their
//! occurrences are merged from two already-known sorted occurrence sets.
//! Sets are kept in an LRU cache shared by every tree built over the same
//! suffix array, so repeated patterns across sentences are computed once.

pub mod corpus;
pub mod error;
pub mod index;
pub mod intersect;
pub mod output;
pub mod pattern;
pub mod tree;
pub mod utils;

pub use error::{InvariantViolation, MatchError, Result};
