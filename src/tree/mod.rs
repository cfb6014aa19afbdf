//! Prefix trees of sentence patterns
//!
//! - `config`: extraction limits
//! - `node`: arena nodes and matched-pattern records
//! - `prefix_tree`: construction and inspection

pub mod config;
pub mod node;
pub mod prefix_tree;

pub use config::ExtractionConfig;
pub use node::{BOT, MatchedPattern, Node, NodeId, ROOT};
pub use prefix_tree::PrefixTree;
