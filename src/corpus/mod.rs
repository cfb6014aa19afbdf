//! Corpus data containers
//!
//! - `vocab`: token string <-> id mapping and the nonterminal sentinel
//! - `array`: flat integer-coded corpus with sentence boundaries
//! - `storage`: owned or memory-mapped 4-byte integer arrays

pub mod array;
pub mod storage;
pub mod vocab;

pub use array::CorpusArray;
pub use storage::IntArray;
pub use vocab::{Vocabulary, UNKNOWN_WORD, X, X_STRING};
