//! Pattern data model
//!
//! - `pattern`: token sequences with nonterminal gaps
//! - `phrase`: one occurrence of a pattern, and the prefix/suffix merge rule
//! - `phrases`: flat occurrence sets for one pattern
//! - `cache`: shared LRU cache of occurrence sets

#[allow(clippy::module_inception)]
pub mod pattern;
pub mod cache;
pub mod phrase;
pub mod phrases;

pub use cache::{CacheStats, PatternCache, SpanLimits, DEFAULT_CACHE_CAPACITY};
pub use pattern::Pattern;
pub use phrase::HierarchicalPhrase;
pub use phrases::{HierarchicalPhraseSet, PhraseSetBuilder};
