//! Prefix tree of all patterns of a sentence
//!
//! Every path from the root spells a pattern over the sentence's tokens and
//! `X`. Nodes are created breadth first from a work queue of
//! `(pattern, i, j, node)` tuples: extend the pattern at `node`, spanning
//! sentence positions `i..j`, by the token at `j`. Each new node is linked to
//! the node of its pattern minus the first token, and its occurrences are
//! computed from its parent's and that suffix node's occurrences.
//!
//! A node whose pattern does not occur is inactive. Nothing is ever added
//! below an inactive node, and a node whose suffix link is inactive is
//! inactive without a lookup.

use super::config::ExtractionConfig;
use super::node::{BOT, MatchedPattern, Node, NodeId, ROOT};
use crate::corpus::{Vocabulary, X};
use crate::error::{InvariantViolation, MatchError, Result};
use crate::index::SuffixArray;
use crate::intersect::query_intersect;
use crate::pattern::{HierarchicalPhraseSet, Pattern};
use std::collections::VecDeque;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

/// A pending extension: the pattern at `node` spans `i..j`, add token `j`
///
/// `i` is -1 for a leading gap that starts before the sentence.
struct Tuple {
    pattern: Pattern,
    i: isize,
    j: isize,
    node: NodeId,
}

/// Prefix tree over one or more sentences, backed by a suffix array
pub struct PrefixTree<'a> {
    suffix_array: &'a SuffixArray,
    config: ExtractionConfig,
    nodes: Vec<Node>,
    x_node: Option<NodeId>,
}

impl<'a> PrefixTree<'a> {
    /// An empty tree: BOT, the root and, when gaps are allowed, the root's `X` child
    pub fn new(suffix_array: &'a SuffixArray, config: ExtractionConfig) -> Self {
        let mut bot = Node::new(BOT, None, Pattern::empty());
        bot.active = true;

        let mut root = Node::new(ROOT, None, Pattern::empty());
        root.active = true;
        root.suffix_link = Some(BOT);
        if !suffix_array.is_empty() {
            root.bounds = Some((0, suffix_array.size() - 1));
        }

        let mut tree = Self {
            suffix_array,
            config,
            nodes: vec![bot, root],
            x_node: None,
        };

        if tree.config.max_nonterminals > 0 {
            let id = tree.nodes.len();
            let mut x_node = Node::new(id, Some(X), Pattern::nonterminal());
            x_node.active = true;
            x_node.suffix_link = Some(ROOT);
            tree.nodes.push(x_node);
            tree.nodes[ROOT].children.insert(X, id);
            tree.x_node = Some(id);
        }

        tree
    }

    /// Add every pattern of `sentence` (token ids) to the tree
    pub fn add(&mut self, sentence: &[i32]) -> Result<()> {
        let start = Instant::now();
        let nodes_before = self.nodes.len();
        let end = sentence.len() as isize - 1;
        let mut queue = VecDeque::new();
        let mut pops = 0usize;

        for i in 0..=end {
            queue.push_back(Tuple {
                pattern: Pattern::empty(),
                i,
                j: i,
                node: ROOT,
            });
        }

        if let Some(x_node) = self.x_node {
            let first = if self.config.sentence_initial_x { 0 } else { 1 };
            for i in first..=end {
                queue.push_back(Tuple {
                    pattern: Pattern::nonterminal(),
                    i: i - 1,
                    j: i,
                    node: x_node,
                });
            }
        }

        while let Some(Tuple { pattern, i, j, node }) = queue.pop_front() {
            pops += 1;
            if j > end {
                continue;
            }

            let token = sentence[j as usize];
            let extended = pattern.with_token(token);

            if let Some(child) = self.nodes[node].child(token) {
                if self.nodes[child].active {
                    self.extend_queue(&mut queue, i, j, sentence.len(), extended, child)?;
                }
                continue;
            }

            let child = self.add_child(node, token, extended.clone())?;
            let suffix_node = self.calculate_suffix_link(node, token)?;
            self.nodes[child].suffix_link = Some(suffix_node);

            if !self.nodes[suffix_node].active {
                continue;
            }

            let phrases = self.query(&extended, child, node, suffix_node)?;
            let found = !phrases.is_empty();
            self.nodes[child].phrases = phrases;
            self.nodes[child].active = found;
            if found {
                self.extend_queue(&mut queue, i, j, sentence.len(), extended, child)?;
            }
        }

        log::debug!(
            "added sentence of {} tokens: {} new nodes, {} queue pops in {:?}",
            sentence.len(),
            self.nodes.len() - nodes_before,
            pops,
            start.elapsed()
        );
        Ok(())
    }

    /// Occurrences of `pattern`, the pattern of new node `node`
    fn query(
        &mut self,
        pattern: &Pattern,
        node: NodeId,
        prefix: NodeId,
        suffix: NodeId,
    ) -> Result<Arc<HierarchicalPhraseSet>> {
        let sa = self.suffix_array;
        let cache = sa.cache();
        let limits = self.config.span_limits();

        if let Some(cached) = cache.get_within(pattern, limits) {
            if pattern.arity() == 0 {
                let bounds = self.bounded_lookup(pattern, prefix);
                self.nodes[node].bounds = bounds;
            }
            return Ok(cached);
        }

        let result = if pattern.arity() == 0 {
            match self.bounded_lookup(pattern, prefix) {
                Some(bounds) => {
                    self.nodes[node].bounds = Some(bounds);
                    let positions = sa.matching_positions(pattern.words(), bounds);
                    HierarchicalPhraseSet::from_positions(pattern.clone(), &positions, sa.corpus())
                }
                None => HierarchicalPhraseSet::empty(pattern.clone()),
            }
        } else {
            let prefix_pattern = self.nodes[prefix].pattern();
            if pattern.arity() == 1
                && prefix_pattern.starts_with_nonterminal()
                && prefix_pattern.ends_with_nonterminal()
            {
                self.nodes[suffix].phrases.with_initial_x()
            } else {
                query_intersect(
                    pattern.clone(),
                    &self.nodes[prefix].phrases,
                    &self.nodes[suffix].phrases,
                    self.config.min_nonterminal_span,
                    self.config.max_phrase_span,
                )?
            }
        };

        let result = Arc::new(result);
        cache.insert_within(Arc::clone(&result), limits);
        Ok(result)
    }

    /// Suffix-array range of a gap-free pattern, searched within its parent's range
    fn bounded_lookup(&self, pattern: &Pattern, parent: NodeId) -> Option<(usize, usize)> {
        let (lo, hi) = self.nodes[parent].bounds?;
        self.suffix_array.find_phrase(pattern.words(), lo, hi)
    }

    /// Queue the extensions of `pattern`, now matched at `node` over `i..=j`
    fn extend_queue(
        &mut self,
        queue: &mut VecDeque<Tuple>,
        i: isize,
        j: isize,
        sentence_len: usize,
        pattern: Pattern,
        node: NodeId,
    ) -> Result<()> {
        let config = &self.config;
        let len = sentence_len as isize;
        let max_span = config.max_phrase_span as isize;
        let last = if config.sentence_final_x { j } else { j + 1 };
        let span = (j + 1) - i + 1;

        if pattern.len() >= config.max_phrase_length || last >= len {
            return Ok(());
        }

        if span <= max_span {
            queue.push_back(Tuple {
                pattern: pattern.clone(),
                i,
                j: j + 1,
                node,
            });
        }

        if pattern.arity() >= config.max_nonterminals || span > max_span {
            return Ok(());
        }

        let x_node = match self.nodes[node].child(X) {
            Some(id) => id,
            None => {
                let id = self.add_child(node, X, pattern.with_final_x())?;
                let link = self.calculate_suffix_link(node, X)?;
                self.nodes[id].suffix_link = Some(link);
                id
            }
        };

        let x_pattern = pattern.with_final_x();
        let cache = self.suffix_array.cache();
        let limits = self.config.span_limits();
        let phrases = match cache.get_within(&x_pattern, limits) {
            Some(cached) => cached,
            None => {
                let phrases = Arc::new(self.nodes[node].phrases.with_final_x());
                cache.insert_within(Arc::clone(&phrases), limits);
                phrases
            }
        };
        self.nodes[x_node].phrases = phrases;
        self.nodes[x_node].active = true;

        if pattern.len() + 2 <= self.config.max_phrase_length {
            let last_start = if self.config.sentence_final_x { len } else { len - 1 };
            let limit = if last_start < i + max_span {
                last_start
            } else {
                i + max_span - 1
            };
            for k in (j + 2)..=limit {
                queue.push_back(Tuple {
                    pattern: x_pattern.clone(),
                    i,
                    j: k,
                    node: x_node,
                });
            }
        }

        Ok(())
    }

    fn add_child(&mut self, parent: NodeId, token: i32, pattern: Pattern) -> Result<NodeId> {
        if self.nodes[parent].has_child(token) {
            return Err(InvariantViolation::DuplicateChild { node: parent, token }.into());
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, Some(token), pattern));
        self.nodes[parent].children.insert(token, id);
        Ok(id)
    }

    /// The node for `pattern(parent) + token` minus its first token
    fn calculate_suffix_link(&self, parent: NodeId, token: i32) -> Result<NodeId> {
        let missing = || MatchError::from(InvariantViolation::MissingSuffixLink { node: parent, token });
        let link = self.nodes[parent].suffix_link.ok_or_else(missing)?;
        if link == BOT {
            return Ok(ROOT);
        }
        self.nodes[link].child(token).ok_or_else(missing)
    }

    /// Number of nodes, the root included and BOT excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All nodes in creation order, BOT first
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn suffix_array(&self) -> &'a SuffixArray {
        self.suffix_array
    }

    /// Active nodes other than BOT and the root
    pub fn active_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[ROOT + 1..].iter().filter(|n| n.active)
    }

    /// Follow `pattern` down from the root
    ///
    /// The root and its `X` child are active but carry empty occurrence sets,
    /// so looking up `[X]` alone yields a node with no occurrences.
    pub fn lookup(&self, pattern: &Pattern) -> Option<&Node> {
        let mut id = ROOT;
        for &token in pattern.words() {
            id = self.nodes[id].child(token)?;
        }
        self.nodes.get(id)
    }

    /// Every pattern with at least one occurrence, in node creation order
    pub fn matched_patterns(&self) -> Vec<MatchedPattern> {
        self.active_nodes()
            .filter(|n| !n.phrases.is_empty())
            .map(|n| MatchedPattern {
                node: n.id,
                phrases: Arc::clone(&n.phrases),
            })
            .collect()
    }

    /// Render the tree as `[id{n} {label} ({suffix link}) {children}]`
    ///
    /// Children are listed in creation order and inactive nodes are marked
    /// with `*`. Without a vocabulary, terminals print as their ids.
    pub fn dump(&self, vocab: Option<&Vocabulary>) -> String {
        let mut out = String::new();
        self.dump_node(ROOT, vocab, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, vocab: Option<&Vocabulary>, out: &mut String) {
        let node = &self.nodes[id];
        let _ = write!(out, "[id{} ", node.id);
        match (node.token, vocab) {
            (None, _) => out.push_str("ROOT"),
            (Some(t), _) if t < 0 => out.push('X'),
            (Some(t), Some(vocab)) => out.push_str(vocab.word_of(t)),
            (Some(t), None) => {
                let _ = write!(out, "{}", t);
            }
        }
        let _ = write!(out, " ({}) ", node.suffix_link.unwrap_or(BOT));
        for child in node.children() {
            self.dump_node(child, vocab, out);
            out.push(' ');
        }
        if !node.active {
            out.push('*');
        }
        out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusArray, Vocabulary};

    fn index(vocab: &Vocabulary, lines: &[&str]) -> SuffixArray {
        let corpus = CorpusArray::from_sentences(vocab, lines.iter().copied()).unwrap();
        SuffixArray::build(corpus, 1000)
    }

    #[test]
    fn test_new_tree() {
        let vocab = Vocabulary::from_sentences(["a b c"]);
        let sa = index(&vocab, &["a b c"]);
        let tree = PrefixTree::new(&sa, ExtractionConfig::default());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().suffix_link(), Some(BOT));
        assert_eq!(tree.root().bounds(), Some((0, 2)));
        let x = tree.root().child(X).unwrap();
        assert_eq!(tree.node(x).unwrap().suffix_link(), Some(ROOT));
        assert_eq!(tree.dump(Some(&vocab)), "[id1 ROOT (0) [id2 X (1) ] ]");
    }

    #[test]
    fn test_contiguous_only() {
        let vocab = Vocabulary::from_sentences(["a b a b"]);
        let sa = index(&vocab, &["a b a b"]);
        let config = ExtractionConfig {
            max_nonterminals: 0,
            ..ExtractionConfig::default()
        };
        let mut tree = PrefixTree::new(&sa, config);
        tree.add(&vocab.encode("a b a").unwrap()).unwrap();

        // a, b, a b, b a, a b a
        assert_eq!(tree.len(), 6);
        assert!(tree.root().child(X).is_none());

        let ab = tree.lookup(&Pattern::parse(&vocab, "a b").unwrap()).unwrap();
        assert!(ab.is_active());
        assert_eq!(ab.phrases().first_positions(), vec![0, 2]);
        assert_eq!(ab.suffix_link(), tree.root().child(vocab.id_of("b").unwrap()));
    }

    #[test]
    fn test_unknown_word_is_inactive() {
        let vocab = Vocabulary::from_sentences(["a b"]);
        let sa = index(&vocab, &["a b"]);
        let mut tree = PrefixTree::new(&sa, ExtractionConfig::default());
        let sentence = vocab.encode_lenient("a zzz b");
        tree.add(&sentence).unwrap();

        let unknown = tree.root().child(sentence[1]).unwrap();
        assert!(!tree.node(unknown).unwrap().is_active());
        assert!(tree.node(unknown).unwrap().children().is_empty());
        assert!(tree.dump(None).contains(&format!("{} (1) *]", sentence[1])));
    }

    #[test]
    fn test_gapped_pattern() {
        let vocab = Vocabulary::from_sentences(["a b c d"]);
        let sa = index(&vocab, &["a b c d", "a c c d"]);
        let mut tree = PrefixTree::new(&sa, ExtractionConfig::default());
        tree.add(&vocab.encode("a b c d").unwrap()).unwrap();

        let a_x_d = tree.lookup(&Pattern::parse(&vocab, "a X d").unwrap()).unwrap();
        assert!(a_x_d.is_active());
        assert_eq!(a_x_d.phrases().len(), 2);
        assert_eq!(a_x_d.phrases().run_starts(0), &[0, 3]);
        assert_eq!(a_x_d.phrases().run_starts(1), &[4, 7]);
        assert_eq!(a_x_d.phrases().sentence_number(1), 1);

        let a_x_c_d = tree.lookup(&Pattern::parse(&vocab, "a X c d").unwrap()).unwrap();
        assert_eq!(a_x_c_d.phrases().len(), 2);
    }

    #[test]
    fn test_matched_patterns_have_occurrences() {
        let vocab = Vocabulary::from_sentences(["it makes him and it mars him"]);
        let sa = index(&vocab, &["it makes him and it mars him"]);
        let mut tree = PrefixTree::new(&sa, ExtractionConfig::lopez_example());
        tree.add(&vocab.encode("it makes him").unwrap()).unwrap();

        let matched = tree.matched_patterns();
        assert!(!matched.is_empty());
        assert!(matched.iter().all(|m| m.occurrences() > 0));

        let it_x_him = Pattern::parse(&vocab, "it X him").unwrap();
        let found = matched.iter().find(|m| m.pattern() == &it_x_him).unwrap();
        assert_eq!(found.occurrences(), 2);
    }

    #[test]
    fn test_results_are_cached() {
        let vocab = Vocabulary::from_sentences(["a b c"]);
        let sa = index(&vocab, &["a b c"]);
        let sentence = vocab.encode("a b c").unwrap();

        let mut first = PrefixTree::new(&sa, ExtractionConfig::default());
        first.add(&sentence).unwrap();
        let misses = sa.cache().stats().misses;

        let mut second = PrefixTree::new(&sa, ExtractionConfig::default());
        second.add(&sentence).unwrap();

        assert_eq!(sa.cache().stats().misses, misses);
        assert!(sa.cache().stats().hits > 0);
        assert_eq!(first.dump(Some(&vocab)), second.dump(Some(&vocab)));
    }
}
