//! Occurrence sets for one pattern
//!
//! A [`HierarchicalPhraseSet`] stores every corpus occurrence of a pattern in
//! two flat arrays: the start of each terminal run (`num_runs` entries per
//! occurrence) and the sentence number of each occurrence. Occurrences are
//! ordered by the start of their first run, and within equal starts by the
//! remaining run starts.
//!
//! Adding a leading or trailing gap to a pattern does not change where it
//! matches, so [`HierarchicalPhraseSet::with_initial_x`] and
//! [`HierarchicalPhraseSet::with_final_x`] share the arrays with the source set.

use super::pattern::Pattern;
use super::phrase::HierarchicalPhrase;
use crate::corpus::CorpusArray;
use std::sync::Arc;

/// All occurrences of a pattern in a corpus
#[derive(Debug, Clone)]
pub struct HierarchicalPhraseSet {
    pattern: Pattern,
    run_starts: Arc<[usize]>,
    sentence_numbers: Arc<[usize]>,
}

impl HierarchicalPhraseSet {
    /// A set with no occurrences
    pub fn empty(pattern: Pattern) -> Self {
        Self {
            pattern,
            run_starts: Arc::from(Vec::new()),
            sentence_numbers: Arc::from(Vec::new()),
        }
    }

    /// Occurrences of a gap-free pattern, from sorted corpus positions
    ///
    /// Positions where the pattern would run past the end of its sentence
    /// are dropped.
    pub fn from_positions(pattern: Pattern, positions: &[usize], corpus: &CorpusArray) -> Self {
        debug_assert_eq!(pattern.arity(), 0);
        let len = pattern.len();
        let mut run_starts = Vec::with_capacity(positions.len());
        let mut sentence_numbers = Vec::with_capacity(positions.len());
        for &p in positions {
            let sentence = corpus.sentence_index_of(p);
            if p + len <= corpus.sentence_end(sentence) {
                run_starts.push(p);
                sentence_numbers.push(sentence);
            }
        }
        Self {
            pattern,
            run_starts: Arc::from(run_starts),
            sentence_numbers: Arc::from(sentence_numbers),
        }
    }

    /// Assemble from flat arrays
    ///
    /// `run_starts.len()` must equal `sentence_numbers.len() * pattern.num_runs()`.
    pub fn from_parts(pattern: Pattern, run_starts: Vec<usize>, sentence_numbers: Vec<usize>) -> Self {
        debug_assert_eq!(run_starts.len(), sentence_numbers.len() * pattern.num_runs());
        Self {
            pattern,
            run_starts: Arc::from(run_starts),
            sentence_numbers: Arc::from(sentence_numbers),
        }
    }

    /// Same occurrences, relabelled with a leading gap
    pub fn with_initial_x(&self) -> Self {
        Self {
            pattern: self.pattern.with_initial_x(),
            run_starts: Arc::clone(&self.run_starts),
            sentence_numbers: Arc::clone(&self.sentence_numbers),
        }
    }

    /// Same occurrences, relabelled with a trailing gap
    pub fn with_final_x(&self) -> Self {
        Self {
            pattern: self.pattern.with_final_x(),
            run_starts: Arc::clone(&self.run_starts),
            sentence_numbers: Arc::clone(&self.sentence_numbers),
        }
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Number of occurrences
    #[inline]
    pub fn len(&self) -> usize {
        self.sentence_numbers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sentence_numbers.is_empty()
    }

    #[inline]
    pub fn num_runs(&self) -> usize {
        self.pattern.num_runs()
    }

    /// Corpus offset of terminal run `run` in occurrence `occ`
    #[inline]
    pub fn run_start(&self, occ: usize, run: usize) -> usize {
        self.run_starts[occ * self.num_runs() + run]
    }

    /// One past the last token of terminal run `run` in occurrence `occ`
    #[inline]
    pub fn run_end(&self, occ: usize, run: usize) -> usize {
        self.run_start(occ, run) + self.pattern.terminal_run_lengths()[run]
    }

    /// All run starts of one occurrence
    #[inline]
    pub fn run_starts(&self, occ: usize) -> &[usize] {
        let n = self.num_runs();
        &self.run_starts[occ * n..(occ + 1) * n]
    }

    #[inline]
    pub fn sentence_number(&self, occ: usize) -> usize {
        self.sentence_numbers[occ]
    }

    /// Corpus offset of the first terminal of occurrence `occ`
    pub fn first_terminal_index(&self, occ: usize) -> usize {
        self.run_start(occ, 0)
    }

    /// One past the last terminal of occurrence `occ`
    pub fn last_terminal_end(&self, occ: usize) -> usize {
        self.run_end(occ, self.num_runs() - 1)
    }

    /// Distance from the first terminal to the end of the last one
    ///
    /// Leading and trailing gaps are not stored, so they do not count.
    pub fn span(&self, occ: usize) -> usize {
        self.last_terminal_end(occ) - self.first_terminal_index(occ)
    }

    /// True if corpus position `position` lies inside a terminal run of `occ`
    pub fn contains_terminal_at(&self, occ: usize, position: usize) -> bool {
        (0..self.num_runs())
            .any(|run| self.run_start(occ, run) <= position && position < self.run_end(occ, run))
    }

    /// Copy one occurrence out
    pub fn get(&self, occ: usize) -> HierarchicalPhrase {
        HierarchicalPhrase::from_set(self, occ)
    }

    /// Iterate over owned copies of every occurrence
    pub fn iter(&self) -> impl Iterator<Item = HierarchicalPhrase> + '_ {
        (0..self.len()).map(move |occ| self.get(occ))
    }

    /// First-run start of every occurrence
    pub fn first_positions(&self) -> Vec<usize> {
        (0..self.len()).map(|occ| self.run_start(occ, 0)).collect()
    }

    /// Approximate heap footprint in bytes
    pub fn memory_bytes(&self) -> usize {
        (self.run_starts.len() + self.sentence_numbers.len()) * std::mem::size_of::<usize>()
    }
}

impl PartialEq for HierarchicalPhraseSet {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.run_starts[..] == other.run_starts[..]
            && self.sentence_numbers[..] == other.sentence_numbers[..]
    }
}

impl Eq for HierarchicalPhraseSet {}

/// Accumulates occurrences in order, then freezes into a set
pub struct PhraseSetBuilder {
    pattern: Pattern,
    run_starts: Vec<usize>,
    sentence_numbers: Vec<usize>,
}

impl PhraseSetBuilder {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            run_starts: Vec::new(),
            sentence_numbers: Vec::new(),
        }
    }

    /// Append one occurrence; its run count must match the pattern
    pub fn push(&mut self, phrase: &HierarchicalPhrase) {
        debug_assert_eq!(phrase.run_starts().len(), self.pattern.num_runs());
        self.run_starts.extend_from_slice(phrase.run_starts());
        self.sentence_numbers.push(phrase.sentence_number());
    }

    pub fn len(&self) -> usize {
        self.sentence_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentence_numbers.is_empty()
    }

    pub fn build(self) -> HierarchicalPhraseSet {
        HierarchicalPhraseSet::from_parts(self.pattern, self.run_starts, self.sentence_numbers)
    }
}
