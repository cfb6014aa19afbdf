//! Integer-coded corpus
//!
//! All sentences are concatenated into one token stream. A separate table of
//! sentence start offsets maps positions back to sentences.

use super::storage::IntArray;
use super::vocab::Vocabulary;
use crate::error::{MatchError, Result};
use crate::index::suffix_array::types::MAX_COMPARISON_LENGTH;
use std::cmp::Ordering;

/// Flat token stream plus sentence boundaries
#[derive(Debug)]
pub struct CorpusArray {
    words: IntArray,
    sentence_starts: IntArray,
}

impl CorpusArray {
    /// Wrap already-encoded tokens and strictly increasing sentence offsets
    pub fn new(words: impl Into<IntArray>, sentence_starts: impl Into<IntArray>) -> Self {
        Self {
            words: words.into(),
            sentence_starts: sentence_starts.into(),
        }
    }

    /// Encode one sentence per line with `vocab`
    ///
    /// Blank lines still count as (empty) sentences so that sentence numbers
    /// line up with input line numbers.
    pub fn from_sentences<'a>(
        vocab: &Vocabulary,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut words = Vec::new();
        let mut starts = Vec::new();
        for line in lines {
            starts.push(words.len() as i32);
            words.extend(vocab.encode(line)?);
        }
        Ok(Self::new(words, starts))
    }

    /// Borrow the token storage
    pub fn words(&self) -> &IntArray {
        &self.words
    }

    /// Borrow the sentence start table
    pub fn sentence_starts(&self) -> &IntArray {
        &self.sentence_starts
    }

    /// Number of tokens
    #[inline]
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of sentences
    #[inline]
    pub fn num_sentences(&self) -> usize {
        self.sentence_starts.len()
    }

    /// Token id at a corpus position
    #[inline]
    pub fn word_at(&self, position: usize) -> i32 {
        self.words.get(position)
    }

    /// First position of sentence `sentence`; `num_sentences()` maps to `size()`
    #[inline]
    pub fn sentence_start(&self, sentence: usize) -> usize {
        if sentence >= self.num_sentences() {
            self.size()
        } else {
            self.sentence_starts.get(sentence) as usize
        }
    }

    /// One past the last position of sentence `sentence`
    #[inline]
    pub fn sentence_end(&self, sentence: usize) -> usize {
        self.sentence_start(sentence + 1)
    }

    /// Tokens of one sentence
    pub fn sentence(&self, sentence: usize) -> Vec<i32> {
        (self.sentence_start(sentence)..self.sentence_end(sentence))
            .map(|p| self.word_at(p))
            .collect()
    }

    /// Sentence containing `position`, found by binary search
    ///
    /// Empty sentences share their start offset with the next sentence; the
    /// last sentence starting at or before `position` is returned.
    pub fn sentence_index_of(&self, position: usize) -> usize {
        let (mut lo, mut hi) = (0usize, self.num_sentences());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.sentence_starts.get(mid) as usize <= position {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.saturating_sub(1)
    }

    /// Offset of `position` within its sentence
    pub fn sentence_position(&self, position: usize) -> usize {
        position - self.sentence_start(self.sentence_index_of(position))
    }

    /// Compare the corpus suffix at `corpus_start` against `phrase`
    ///
    /// Only `phrase.len()` tokens are compared. A corpus that runs out first
    /// compares as less.
    pub fn compare_phrase(&self, corpus_start: usize, phrase: &[i32]) -> Ordering {
        for (i, &token) in phrase.iter().enumerate() {
            let pos = corpus_start + i;
            if pos >= self.size() {
                return Ordering::Less;
            }
            match self.word_at(pos).cmp(&token) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        Ordering::Equal
    }

    /// Compare two corpus suffixes on at most [`MAX_COMPARISON_LENGTH`] tokens
    ///
    /// A suffix that ends first is less.
    pub fn compare_suffixes(&self, a: usize, b: usize) -> Ordering {
        let n = self.size();
        for i in 0..MAX_COMPARISON_LENGTH {
            let (pa, pb) = (a + i, b + i);
            match (pa < n, pb < n) {
                (false, false) => return Ordering::Equal,
                (false, true) => return Ordering::Less,
                (true, false) => return Ordering::Greater,
                (true, true) => match self.word_at(pa).cmp(&self.word_at(pb)) {
                    Ordering::Equal => {}
                    other => return other,
                },
            }
        }
        Ordering::Equal
    }

    /// Check the sentence table is non-decreasing and inside the corpus
    pub fn validate(&self) -> Result<()> {
        let mut prev = 0i32;
        for (i, start) in self.sentence_starts.iter().enumerate() {
            if start < prev || start as usize > self.size() {
                return Err(MatchError::invalid_format(
                    "sentences.bin",
                    format!("sentence {} starts at {}", i, start),
                ));
            }
            prev = start;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vocabulary, CorpusArray) {
        let lines = ["a b c", "b c", "c a b"];
        let vocab = Vocabulary::from_sentences(lines);
        let corpus = CorpusArray::from_sentences(&vocab, lines).unwrap();
        (vocab, corpus)
    }

    #[test]
    fn test_layout() {
        let (_, corpus) = sample();
        assert_eq!(corpus.size(), 8);
        assert_eq!(corpus.num_sentences(), 3);
        assert_eq!(corpus.sentence_start(1), 3);
        assert_eq!(corpus.sentence_end(2), 8);
        assert_eq!(corpus.sentence(1), vec![1, 2]);
    }

    #[test]
    fn test_sentence_index_of() {
        let (_, corpus) = sample();
        let expected = [0, 0, 0, 1, 1, 2, 2, 2];
        for (pos, &sentence) in expected.iter().enumerate() {
            assert_eq!(corpus.sentence_index_of(pos), sentence, "position {}", pos);
        }
        assert_eq!(corpus.sentence_position(6), 1);
    }

    #[test]
    fn test_sentence_index_with_empty_sentence() {
        let corpus = CorpusArray::new(vec![0, 1, 2], vec![0, 2, 2]);
        assert_eq!(corpus.sentence_index_of(1), 0);
        assert_eq!(corpus.sentence_index_of(2), 2);
    }

    #[test]
    fn test_compare_phrase() {
        let (vocab, corpus) = sample();
        let b_c = vocab.encode("b c").unwrap();
        assert_eq!(corpus.compare_phrase(1, &b_c), Ordering::Equal);
        assert_eq!(corpus.compare_phrase(0, &b_c), Ordering::Less);
        assert_eq!(corpus.compare_phrase(2, &b_c), Ordering::Greater);
        // corpus runs out after "b"
        assert_eq!(corpus.compare_phrase(7, &b_c), Ordering::Less);
        assert_eq!(corpus.compare_phrase(3, &[]), Ordering::Equal);
    }

    #[test]
    fn test_compare_suffixes() {
        let (_, corpus) = sample();
        // "b" (end of corpus) is a prefix of "b c ..."
        assert_eq!(corpus.compare_suffixes(7, 3), Ordering::Less);
        assert_eq!(corpus.compare_suffixes(3, 7), Ordering::Greater);
        assert_eq!(corpus.compare_suffixes(4, 4), Ordering::Equal);
    }

    #[test]
    fn test_validate() {
        assert!(CorpusArray::new(vec![0, 1], vec![0, 1]).validate().is_ok());
        assert!(CorpusArray::new(vec![0, 1], vec![1, 0]).validate().is_err());
        assert!(CorpusArray::new(vec![0, 1], vec![0, 5]).validate().is_err());
    }

    #[test]
    fn test_unknown_word() {
        let vocab = Vocabulary::with_words(["a"]);
        assert!(CorpusArray::from_sentences(&vocab, ["a z"]).is_err());
    }
}
