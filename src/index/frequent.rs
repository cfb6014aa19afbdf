//! Frequent contiguous phrases
//!
//! Finds the most frequent gap-free phrases of a corpus from its suffix
//! array and longest-common-prefix array, and can preload their occurrence
//! sets into the pattern cache before any prefix tree is built.
//!
//! ## Algorithm
//!
//! Suffixes sharing a phrase of length `n` form a contiguous interval of the
//! suffix array in which every adjacent pair has a common prefix of at least
//! `n` tokens. For each length up to the limit the intervals are read off the
//! LCP array in one pass. Occurrences that would run past the end of their
//! sentence are not counted.

use crate::index::suffix_array::SuffixArray;
use crate::index::suffix_array::types::MAX_COMPARISON_LENGTH;
use crate::pattern::Pattern;
use std::cmp::Reverse;
use std::time::Instant;

/// Phrases ordered from most to least frequent
#[derive(Debug, Clone, Default)]
pub struct FrequentPhrases {
    phrases: Vec<(Pattern, usize)>,
}

impl FrequentPhrases {
    /// Collect at most `max_phrases` phrases of up to `max_length` tokens
    /// occurring at least `min_frequency` times
    pub fn compute(sa: &SuffixArray, min_frequency: usize, max_phrases: usize, max_length: usize) -> Self {
        let start = Instant::now();
        let n = sa.size();
        let corpus = sa.corpus();
        let lcp = longest_common_prefixes(sa);
        let max_length = max_length.min(MAX_COMPARISON_LENGTH);
        let min_frequency = min_frequency.max(1);

        let fits = |position: usize, len: usize| {
            position + len <= corpus.sentence_end(corpus.sentence_index_of(position))
        };

        let mut candidates = Vec::new();
        for len in 1..=max_length {
            let mut i = 0;
            while i < n {
                let mut j = i + 1;
                while j < n && lcp[j] >= len {
                    j += 1;
                }

                let mut count = 0;
                let mut example = None;
                for k in i..j {
                    let position = sa.corpus_index_of(k);
                    if fits(position, len) {
                        count += 1;
                        example.get_or_insert(position);
                    }
                }

                match example {
                    Some(position) if count >= min_frequency => {
                        let words: Vec<i32> =
                            (position..position + len).map(|p| corpus.word_at(p)).collect();
                        candidates.push((Pattern::new(words), count));
                    }
                    _ => {}
                }
                i = j;
            }
        }

        candidates.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        candidates.truncate(max_phrases);

        log::debug!(
            "found {} frequent phrases in {:?}",
            candidates.len(),
            start.elapsed()
        );

        Self { phrases: candidates }
    }

    /// Phrases with their frequencies, most frequent first
    pub fn phrases(&self) -> &[(Pattern, usize)] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Load every phrase's occurrence set into the suffix array's cache
    pub fn warm(&self, sa: &SuffixArray) -> usize {
        for (pattern, _) in &self.phrases {
            sa.contiguous_phrases(pattern);
        }
        log::info!("warmed pattern cache with {} phrases", self.phrases.len());
        self.phrases.len()
    }
}

/// `lcp[i]` is the common prefix length of suffixes `i - 1` and `i`
///
/// The array has `size + 1` entries; the first and last are zero. Lengths are
/// capped at the suffix comparison length.
pub fn longest_common_prefixes(sa: &SuffixArray) -> Vec<usize> {
    let n = sa.size();
    let corpus = sa.corpus();
    let mut lcp = vec![0usize; n + 1];

    for (i, slot) in lcp.iter_mut().enumerate().take(n).skip(1) {
        let a = sa.corpus_index_of(i - 1);
        let b = sa.corpus_index_of(i);
        let mut common = 0;
        while common < MAX_COMPARISON_LENGTH
            && a + common < n
            && b + common < n
            && corpus.word_at(a + common) == corpus.word_at(b + common)
        {
            common += 1;
        }
        *slot = common;
    }

    lcp
}
