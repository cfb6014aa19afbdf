//! Suffix array builder
//!
//! Builds an index from raw sentences by:
//! 1. Collecting the vocabulary (ids in sorted word order)
//! 2. Encoding every sentence into one flat token stream
//! 3. Sorting all suffix positions using parallel sort
//!
//! The resulting suffix array enables O(m log n) phrase lookup.

use super::search::SuffixArray;
use super::types::*;
use crate::corpus::{CorpusArray, IntArray, Vocabulary};
use crate::error::Result;
use rayon::prelude::*;
use std::time::Instant;

/// Builder for constructing an index from sentences
#[derive(Default)]
pub struct IndexBuilder {
    /// Raw input, one sentence per entry
    sentences: Vec<String>,
    /// Running token count
    token_count: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one whitespace-tokenized sentence
    pub fn add_sentence(&mut self, line: &str) {
        self.token_count += line.split_whitespace().count();
        self.sentences.push(line.to_string());
    }

    /// Number of sentences added so far
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Number of tokens added so far
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Build the vocabulary, corpus and sorted suffix order
    pub fn build(self) -> Result<BuiltIndex> {
        let start = Instant::now();
        let lines = self.sentences.iter().map(String::as_str);

        let vocab = Vocabulary::from_sentences(lines.clone());
        let corpus = CorpusArray::from_sentences(&vocab, lines)?;
        let suffix_order = build_suffix_order(&corpus);

        log::info!(
            "built suffix array: {} tokens, {} sentences, {} words in {:?}",
            corpus.size(),
            corpus.num_sentences(),
            vocab.len(),
            start.elapsed()
        );

        Ok(BuiltIndex {
            vocab,
            corpus,
            suffix_order,
        })
    }
}

/// Result of building an index
pub struct BuiltIndex {
    pub vocab: Vocabulary,
    pub corpus: CorpusArray,
    /// Sorted suffix positions
    pub suffix_order: Vec<i32>,
}

impl BuiltIndex {
    /// Get metadata about this index
    pub fn meta(&self) -> IndexMeta {
        IndexMeta {
            version: FORMAT_VERSION,
            token_count: self.corpus.size() as u64,
            sentence_count: self.corpus.num_sentences() as u64,
            vocab_size: self.vocab.len() as u64,
            comparison_length: MAX_COMPARISON_LENGTH,
        }
    }

    /// Turn into a queryable suffix array, keeping the vocabulary
    pub fn into_suffix_array(self, cache_capacity: usize) -> Result<(Vocabulary, SuffixArray)> {
        let sa = SuffixArray::from_parts(
            self.corpus,
            IntArray::Owned(self.suffix_order),
            cache_capacity,
        )?;
        Ok((self.vocab, sa))
    }
}

/// Sort all corpus positions by the suffix starting there
///
/// Suffixes are compared on their first [`MAX_COMPARISON_LENGTH`] tokens;
/// ties fall back to position so the order is fully deterministic.
pub fn build_suffix_order(corpus: &CorpusArray) -> Vec<i32> {
    let n = corpus.size();

    let mut sa: Vec<i32> = (0..n as i32).collect();

    // For large corpora, use parallel sort
    if n > 100_000 {
        sa.par_sort_unstable_by(|&a, &b| {
            corpus
                .compare_suffixes(a as usize, b as usize)
                .then(a.cmp(&b))
        });
    } else {
        sa.sort_unstable_by(|&a, &b| {
            corpus
                .compare_suffixes(a as usize, b as usize)
                .then(a.cmp(&b))
        });
    }

    sa
}
