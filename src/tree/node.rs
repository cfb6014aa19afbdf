//! Prefix tree nodes
//!
//! Nodes live in an arena owned by [`PrefixTree`](super::PrefixTree) and
//! refer to each other by index. Index 0 is the BOT sentinel, whose child for
//! any token is the root; index 1 is the root.

use crate::pattern::{HierarchicalPhraseSet, Pattern};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Arena handle of a node
pub type NodeId = usize;

/// The sentinel above the root
pub const BOT: NodeId = 0;

/// The node of the empty pattern
pub const ROOT: NodeId = 1;

/// One pattern in a prefix tree
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Token on the edge from the parent; `None` for BOT and the root
    pub(crate) token: Option<i32>,
    pub(crate) active: bool,
    pub(crate) children: FxHashMap<i32, NodeId>,
    pub(crate) suffix_link: Option<NodeId>,
    /// Inclusive suffix-array range of a gap-free pattern
    pub(crate) bounds: Option<(usize, usize)>,
    pub(crate) phrases: Arc<HierarchicalPhraseSet>,
}

impl Node {
    pub(crate) fn new(id: NodeId, token: Option<i32>, pattern: Pattern) -> Self {
        Self {
            id,
            token,
            active: false,
            children: FxHashMap::default(),
            suffix_link: None,
            bounds: None,
            phrases: Arc::new(HierarchicalPhraseSet::empty(pattern)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn token(&self) -> Option<i32> {
        self.token
    }

    /// False when the pattern is known not to occur, so no extension can
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn child(&self, token: i32) -> Option<NodeId> {
        self.children.get(&token).copied()
    }

    pub fn has_child(&self, token: i32) -> bool {
        self.children.contains_key(&token)
    }

    /// Child ids in creation order
    pub fn children(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.children.values().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn suffix_link(&self) -> Option<NodeId> {
        self.suffix_link
    }

    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    pub fn pattern(&self) -> &Pattern {
        self.phrases.pattern()
    }

    pub fn phrases(&self) -> &Arc<HierarchicalPhraseSet> {
        &self.phrases
    }
}

/// A pattern matched by a tree together with all of its occurrences
#[derive(Debug, Clone)]
pub struct MatchedPattern {
    pub node: NodeId,
    pub phrases: Arc<HierarchicalPhraseSet>,
}

impl MatchedPattern {
    pub fn pattern(&self) -> &Pattern {
        self.phrases.pattern()
    }

    pub fn occurrences(&self) -> usize {
        self.phrases.len()
    }
}
