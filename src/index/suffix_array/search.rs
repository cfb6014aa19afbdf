//! Suffix array queries
//!
//! [`SuffixArray`] owns a corpus, the sorted order of its suffixes and the
//! pattern cache shared by every prefix tree built against it. Lookups run a
//! binary search bounded to an inclusive suffix-array range, so a caller that
//! already knows the range of a phrase can narrow the search for any
//! extension of it.

use super::builder::build_suffix_order;
use super::types::MAX_COMPARISON_LENGTH;
use crate::corpus::{CorpusArray, IntArray};
use crate::error::{MatchError, Result};
use crate::pattern::{HierarchicalPhraseSet, Pattern, PatternCache};
use std::cmp::Ordering;
use std::sync::Arc;

/// Sorted suffixes of a corpus plus the pattern cache
#[derive(Debug)]
pub struct SuffixArray {
    corpus: CorpusArray,
    order: IntArray,
    cache: PatternCache,
}

impl SuffixArray {
    /// Sort the suffixes of `corpus`
    pub fn build(corpus: CorpusArray, cache_capacity: usize) -> Self {
        let order = build_suffix_order(&corpus);
        Self {
            corpus,
            order: IntArray::Owned(order),
            cache: PatternCache::new(cache_capacity),
        }
    }

    /// Pair a corpus with a previously computed suffix order
    ///
    /// Fails if the order does not have one entry per corpus token, or
    /// names a position outside the corpus.
    pub fn from_parts(corpus: CorpusArray, order: IntArray, cache_capacity: usize) -> Result<Self> {
        if order.len() != corpus.size() {
            return Err(MatchError::SizeMismatch {
                expected: corpus.size(),
                found: order.len(),
            });
        }
        if let Some(bad) = order.iter().find(|&p| p < 0 || p as usize >= corpus.size()) {
            return Err(MatchError::invalid_format(
                "sa.bin",
                format!("suffix position {} outside a corpus of {} tokens", bad, corpus.size()),
            ));
        }
        Ok(Self {
            corpus,
            order,
            cache: PatternCache::new(cache_capacity),
        })
    }

    #[inline]
    pub fn corpus(&self) -> &CorpusArray {
        &self.corpus
    }

    #[inline]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Raw suffix order
    pub fn order(&self) -> &IntArray {
        &self.order
    }

    /// Number of suffixes (equals the corpus size)
    #[inline]
    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Corpus position of the suffix at `sa_index`
    #[inline]
    pub fn corpus_index_of(&self, sa_index: usize) -> usize {
        self.order.get(sa_index) as usize
    }

    /// Sentence containing a corpus position
    pub fn sentence_index_of(&self, position: usize) -> usize {
        self.corpus.sentence_index_of(position)
    }

    /// Binary search for the first or last suffix in `[lo, hi]` starting with `phrase`
    ///
    /// Suffixes are only ordered on their first [`MAX_COMPARISON_LENGTH`]
    /// tokens, so a longer phrase is searched by that prefix.
    pub fn find_phrase_bound(&self, phrase: &[i32], lo: usize, hi: usize, find_first: bool) -> Option<usize> {
        if phrase.is_empty() || self.is_empty() {
            return None;
        }
        let phrase = &phrase[..phrase.len().min(MAX_COMPARISON_LENGTH)];
        let (mut low, mut high) = (lo, hi.min(self.size() - 1));

        while low <= high {
            let mid = low + (high - low) / 2;
            match self.compare_at(mid, phrase) {
                Ordering::Equal => {
                    if find_first {
                        if mid == lo || self.compare_at(mid - 1, phrase) != Ordering::Equal {
                            return Some(mid);
                        }
                        high = mid - 1;
                    } else {
                        if mid >= high || self.compare_at(mid + 1, phrase) != Ordering::Equal {
                            return Some(mid);
                        }
                        low = mid + 1;
                    }
                }
                Ordering::Less => low = mid + 1,
                Ordering::Greater => {
                    if mid == 0 {
                        break;
                    }
                    high = mid - 1;
                }
            }
        }

        None
    }

    /// Inclusive range of suffixes in `[lo, hi]` starting with `phrase`
    ///
    /// For a phrase longer than [`MAX_COMPARISON_LENGTH`] the range holds
    /// every suffix sharing its first tokens; [`matching_positions`](Self::matching_positions)
    /// keeps the real matches.
    pub fn find_phrase(&self, phrase: &[i32], lo: usize, hi: usize) -> Option<(usize, usize)> {
        let first = self.find_phrase_bound(phrase, lo, hi, true)?;
        let last = self.find_phrase_bound(phrase, first, hi, false)?;
        Some((first, last))
    }

    /// Inclusive range of suffixes starting with `phrase`, over the whole array
    pub fn find(&self, phrase: &[i32]) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        self.find_phrase(phrase, 0, self.size() - 1)
    }

    /// Corpus positions of an inclusive suffix-array range, in corpus order
    pub fn positions_for(&self, range: (usize, usize)) -> Vec<usize> {
        let (lo, hi) = range;
        if lo > hi || hi >= self.size() {
            return Vec::new();
        }
        let mut positions: Vec<usize> = (lo..=hi).map(|i| self.corpus_index_of(i)).collect();
        positions.sort_unstable();
        positions
    }

    /// Sorted corpus positions in `range` where all of `phrase` occurs
    pub fn matching_positions(&self, phrase: &[i32], range: (usize, usize)) -> Vec<usize> {
        let mut positions = self.positions_for(range);
        if phrase.len() > MAX_COMPARISON_LENGTH {
            positions.retain(|&p| self.corpus.compare_phrase(p, phrase) == Ordering::Equal);
        }
        positions
    }

    /// Sorted corpus positions where `phrase` occurs
    pub fn phrase_positions(&self, phrase: &[i32]) -> Vec<usize> {
        self.find(phrase)
            .map(|range| self.matching_positions(phrase, range))
            .unwrap_or_default()
    }

    /// Occurrence set of a gap-free pattern, through the cache
    pub fn contiguous_phrases(&self, pattern: &Pattern) -> Arc<HierarchicalPhraseSet> {
        if let Some(cached) = self.cache.get(pattern) {
            return cached;
        }
        let positions = self.phrase_positions(pattern.words());
        let phrases = Arc::new(HierarchicalPhraseSet::from_positions(
            pattern.clone(),
            &positions,
            &self.corpus,
        ));
        self.cache.insert(Arc::clone(&phrases));
        phrases
    }

    #[inline]
    fn compare_at(&self, sa_index: usize, phrase: &[i32]) -> Ordering {
        self.corpus.compare_phrase(self.corpus_index_of(sa_index), phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Vocabulary;

    const LOPEZ: &str = "it makes him and it mars him , it sets him on and it takes him off .";

    fn lopez() -> (Vocabulary, SuffixArray) {
        let vocab = Vocabulary::from_sentences([LOPEZ]);
        let corpus = CorpusArray::from_sentences(&vocab, [LOPEZ]).unwrap();
        (vocab, SuffixArray::build(corpus, 16))
    }

    fn brute_force(corpus: &CorpusArray, phrase: &[i32]) -> Vec<usize> {
        (0..corpus.size())
            .filter(|&p| corpus.compare_phrase(p, phrase) == Ordering::Equal)
            .collect()
    }

    #[test]
    fn test_lopez_bounds() {
        let (vocab, sa) = lopez();
        assert_eq!(sa.size(), 18);

        let it_makes_him = vocab.encode("it makes him").unwrap();
        assert_eq!(sa.find(&it_makes_him), Some((8, 8)));

        let and_it = vocab.encode("and it").unwrap();
        assert_eq!(sa.find(&and_it), Some((2, 3)));
    }

    #[test]
    fn test_sorted() {
        let (_, sa) = lopez();
        for i in 1..sa.size() {
            let prev = sa.corpus_index_of(i - 1);
            let cur = sa.corpus_index_of(i);
            assert_ne!(sa.corpus().compare_suffixes(prev, cur), Ordering::Greater);
        }
    }

    #[test]
    fn test_positions_match_brute_force() {
        let (vocab, sa) = lopez();
        for phrase in ["him", "it", "and it", "him ,", "it takes him off .", "."] {
            let ids = vocab.encode(phrase).unwrap();
            assert_eq!(
                sa.phrase_positions(&ids),
                brute_force(sa.corpus(), &ids),
                "phrase {}",
                phrase
            );
        }
        assert_eq!(sa.phrase_positions(&vocab.encode("him").unwrap()), vec![2, 6, 10, 15]);
    }

    #[test]
    fn test_not_found() {
        let (vocab, sa) = lopez();
        assert_eq!(sa.find(&vocab.encode("him it").unwrap()), None);
        assert_eq!(sa.find(&vocab.encode(". it").unwrap()), None);
        assert_eq!(sa.find(&[]), None);
        assert!(sa.phrase_positions(&vocab.encode("off him").unwrap()).is_empty());
    }

    #[test]
    fn test_bounded_search() {
        let (vocab, sa) = lopez();
        let (lo, hi) = sa.find(&vocab.encode("it").unwrap()).unwrap();
        assert_eq!(hi - lo, 3);

        let it_sets = vocab.encode("it sets").unwrap();
        let range = sa.find_phrase(&it_sets, lo, hi).unwrap();
        assert_eq!(sa.positions_for(range), vec![8]);

        // Outside the range nothing is found
        assert_eq!(sa.find_phrase(&it_sets, 0, lo - 1), None);
    }

    #[test]
    fn test_empty_corpus() {
        let sa = SuffixArray::build(CorpusArray::new(Vec::new(), Vec::new()), 4);
        assert!(sa.is_empty());
        assert_eq!(sa.find(&[0]), None);
        assert!(sa.positions_for((0, 0)).is_empty());
    }

    #[test]
    fn test_size_mismatch() {
        let corpus = CorpusArray::new(vec![0, 1, 2], vec![0]);
        let err = SuffixArray::from_parts(corpus, IntArray::Owned(vec![0, 1]), 4).unwrap_err();
        assert!(matches!(err, MatchError::SizeMismatch { expected: 3, found: 2 }));
    }

    #[test]
    fn test_out_of_range_order() {
        let corpus = CorpusArray::new(vec![0, 1, 2], vec![0]);
        let err = SuffixArray::from_parts(corpus, IntArray::Owned(vec![0, 7, 1]), 4).unwrap_err();
        assert!(matches!(err, MatchError::InvalidFormat { .. }));

        let corpus = CorpusArray::new(vec![0, 1, 2], vec![0]);
        assert!(SuffixArray::from_parts(corpus, IntArray::Owned(vec![0, -1, 1]), 4).is_err());
    }

    #[test]
    fn test_phrases_longer_than_comparison_length() {
        // Nine sentences sharing a 20-token prefix, told apart by the last token
        let mut words = Vec::new();
        let mut starts = Vec::new();
        for k in 1..=9 {
            starts.push(words.len() as i32);
            words.extend(std::iter::repeat_n(0, MAX_COMPARISON_LENGTH));
            words.push(k);
        }
        let corpus = CorpusArray::new(words, starts);
        let sa = SuffixArray::build(corpus, 4);

        for k in 1..=9 {
            let mut phrase = vec![0; MAX_COMPARISON_LENGTH];
            phrase.push(k);
            let found = sa.phrase_positions(&phrase);
            assert_eq!(found, brute_force(sa.corpus(), &phrase), "phrase ending in {}", k);
            assert_eq!(found, vec![(k as usize - 1) * (MAX_COMPARISON_LENGTH + 1)]);
        }

        let mut missing = vec![0; MAX_COMPARISON_LENGTH];
        missing.push(10);
        assert!(sa.phrase_positions(&missing).is_empty());
    }

    #[test]
    fn test_contiguous_phrases_cached() {
        let (vocab, sa) = lopez();
        let pattern = Pattern::parse(&vocab, "it").unwrap();
        let first = sa.contiguous_phrases(&pattern);
        assert_eq!(first.first_positions(), vec![0, 4, 8, 13]);

        let second = sa.contiguous_phrases(&pattern);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(sa.cache().stats().hits, 1);
    }

    #[test]
    fn test_duplicate_suffixes() {
        let corpus = CorpusArray::new(vec![0; 30], vec![0]);
        let sa = SuffixArray::build(corpus, 4);
        // Suffixes longer than the comparison length tie; every one still matches
        assert_eq!(sa.phrase_positions(&[0, 0]).len(), 29);
        assert_eq!(sa.phrase_positions(&[0]), (0..30).collect::<Vec<_>>());
    }
}
