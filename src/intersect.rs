//! Occurrence-set intersection (QUERY_INTERSECT)
//!
//! The occurrences of a gapped pattern `a α b` are computed from those of its
//! prefix `a α` and its suffix `α b` without touching the corpus. Both input
//! sets are ordered by first run start, so one forward pass over each side
//! suffices. Pairs are decided by a three-way comparator:
//!
//! - `Equal`: the shared `α` lines up token for token at the same corpus
//!   offsets, and the combined occurrence fits within the span limit
//! - `Greater`: the suffix occurrence lies too early to ever pair with this
//!   or any later prefix occurrence; advance the suffix side
//! - `Less`: this suffix occurrence and every later one lie beyond what the
//!   prefix occurrence can reach; advance the prefix side
//!
//! See Lopez (2008), "Machine Translation by Pattern Matching", chapter 4.

use crate::error::{InvariantViolation, Result};
use crate::pattern::{HierarchicalPhrase, HierarchicalPhraseSet, Pattern, PhraseSetBuilder};
use std::cmp::Ordering;

/// How the prefix and suffix occurrences overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// `a X` and `X b` with single-token runs: nothing is shared but the gap
    GapOnly,
    /// Compare `count` run starts, offset by `skip` runs on the prefix side;
    /// `shift` moves the first prefix run start past a leading terminal
    Runs { skip: usize, count: usize, shift: bool },
}

/// Pairs occurrences of a prefix pattern with occurrences of a suffix pattern
pub struct Intersector<'a> {
    prefix: &'a HierarchicalPhraseSet,
    suffix: &'a HierarchicalPhraseSet,
    overlap: Overlap,
    min_nonterminal_span: usize,
    max_phrase_span: usize,
}

impl<'a> Intersector<'a> {
    /// Fails if the two patterns do not share the same number of runs
    pub fn new(
        prefix: &'a HierarchicalPhraseSet,
        suffix: &'a HierarchicalPhraseSet,
        min_nonterminal_span: usize,
        max_phrase_span: usize,
    ) -> Result<Self> {
        let overlap = overlap_of(prefix.pattern(), suffix.pattern())?;
        Ok(Self {
            prefix,
            suffix,
            overlap,
            min_nonterminal_span,
            max_phrase_span,
        })
    }

    /// Dotted comparison of prefix occurrence `i` with suffix occurrence `j`
    pub fn compare(&self, i: usize, j: usize) -> Ordering {
        let (prefix, suffix) = (self.prefix, self.suffix);

        match prefix.sentence_number(i).cmp(&suffix.sentence_number(j)) {
            Ordering::Equal => {}
            other => return other,
        }

        let prefix_start = prefix.run_start(i, 0);
        let suffix_start = suffix.run_start(j, 0);
        if prefix_start > suffix_start {
            return Ordering::Greater;
        }
        if prefix_start + self.max_phrase_span <= suffix_start {
            return Ordering::Less;
        }

        match self.overlap {
            Overlap::GapOnly => {
                // gap of at least one token, see "Single-token special case" in DESIGN.md
                if prefix_start + 1 >= suffix_start {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
            Overlap::Runs { skip, count, shift } => {
                for run in 0..count {
                    let mut a = prefix.run_start(i, run + skip);
                    if run == 0 && shift {
                        a += 1;
                    }
                    let b = suffix.run_start(j, run);
                    match a.cmp(&b) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                }

                let last = suffix.num_runs() - 1;
                let mut length = suffix.run_end(j, last) - prefix_start;
                if suffix.pattern().ends_with_nonterminal() {
                    length += self.min_nonterminal_span;
                }
                if prefix.pattern().starts_with_nonterminal() {
                    length += self.min_nonterminal_span;
                }

                if length > self.max_phrase_span {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            }
        }
    }

    /// Merge the two sets into the occurrence set of `pattern`
    pub fn intersect(&self, pattern: Pattern) -> HierarchicalPhraseSet {
        let (prefix, suffix) = (self.prefix, self.suffix);
        let (prefix_len, suffix_len) = (prefix.len(), suffix.len());
        let mut out = PhraseSetBuilder::new(pattern.clone());

        let (mut i, mut j) = (0, 0);
        while i < prefix_len && j < suffix_len {
            while j < suffix_len && self.compare(i, j) == Ordering::Greater {
                j += 1;
            }

            // every prefix occurrence starting here resumes from the same j
            let group_start = prefix.run_start(i, 0);
            while i < prefix_len && prefix.run_start(i, 0) == group_start {
                let mut l = j;
                while l < suffix_len {
                    match self.compare(i, l) {
                        Ordering::Less => break,
                        Ordering::Equal => {
                            let merged = HierarchicalPhrase::merge(
                                pattern.clone(),
                                &prefix.get(i),
                                &suffix.get(l),
                            );
                            out.push(&merged);
                        }
                        Ordering::Greater => {}
                    }
                    l += 1;
                }
                i += 1;
            }
        }

        out.build()
    }
}

/// Decide how `prefix` and `suffix` line up, checking both sides agree
fn overlap_of(prefix: &Pattern, suffix: &Pattern) -> Result<Overlap> {
    if prefix.ends_with_nonterminal()
        && suffix.starts_with_nonterminal()
        && prefix.arity() == 1
        && suffix.arity() == 1
        && prefix.terminal_run_lengths().first() == Some(&1)
        && suffix.terminal_run_lengths().first() == Some(&1)
    {
        return Ok(Overlap::GapOnly);
    }

    let suffix_runs = suffix.num_runs();
    let suffix_count = if suffix.ends_with_nonterminal() || suffix.ends_with_two_terminals() {
        suffix_runs
    } else {
        suffix_runs.saturating_sub(1)
    };

    let prefix_runs = prefix.num_runs();
    let (skip, prefix_count, shift) = if prefix.starts_with_nonterminal() {
        (0, prefix_runs, false)
    } else if prefix.second_token_is_terminal() {
        (0, prefix_runs, true)
    } else {
        (1, prefix_runs.saturating_sub(1), false)
    };

    if prefix_count != suffix_count {
        return Err(InvariantViolation::OverlapLengthMismatch {
            prefix: prefix_count,
            suffix: suffix_count,
        }
        .into());
    }

    Ok(Overlap::Runs {
        skip,
        count: prefix_count,
        shift,
    })
}

/// Occurrences of `pattern` from those of its prefix and suffix
pub fn query_intersect(
    pattern: Pattern,
    prefix: &HierarchicalPhraseSet,
    suffix: &HierarchicalPhraseSet,
    min_nonterminal_span: usize,
    max_phrase_span: usize,
) -> Result<HierarchicalPhraseSet> {
    let intersector = Intersector::new(prefix, suffix, min_nonterminal_span, max_phrase_span)?;
    let result = intersector.intersect(pattern);
    log::trace!(
        "intersect {} ({}) x {} ({}) -> {} ({})",
        prefix.pattern(),
        prefix.len(),
        suffix.pattern(),
        suffix.len(),
        result.pattern(),
        result.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::X;
    use crate::error::MatchError;

    const A: i32 = 0;
    const B: i32 = 1;
    const C: i32 = 2;

    fn set(words: Vec<i32>, starts: Vec<usize>, sentences: Vec<usize>) -> HierarchicalPhraseSet {
        HierarchicalPhraseSet::from_parts(Pattern::new(words), starts, sentences)
    }

    #[test]
    fn test_gap_only_pairs() {
        // [a X] at 0, 5; [X b] at 1, 3, 6, 9
        let prefix = set(vec![A, X], vec![0, 5], vec![0, 0]);
        let suffix = set(vec![X, B], vec![1, 3, 6, 9], vec![0, 0, 0, 0]);

        let result = query_intersect(Pattern::new(vec![A, X, B]), &prefix, &suffix, 2, 5).unwrap();
        // b must be at least two past a and within the span: (0,3) and (5,9)
        assert_eq!(result.len(), 2);
        assert_eq!(result.run_starts(0), &[0, 3]);
        assert_eq!(result.run_starts(1), &[5, 9]);
    }

    #[test]
    fn test_gap_only_respects_sentences() {
        let prefix = set(vec![A, X], vec![0, 5], vec![0, 1]);
        let suffix = set(vec![X, B], vec![2, 7], vec![1, 1]);

        let result = query_intersect(Pattern::new(vec![A, X, B]), &prefix, &suffix, 2, 10).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.run_starts(0), &[5, 7]);
        assert_eq!(result.sentence_number(0), 1);
    }

    #[test]
    fn test_extends_last_run() {
        // [a X b] x [X b c] -> [a X b c]
        let prefix = set(vec![A, X, B], vec![0, 2, 0, 4, 3, 4], vec![0, 0, 0]);
        let suffix = set(vec![X, B, C], vec![4], vec![0]);

        let result = query_intersect(Pattern::new(vec![A, X, B, C]), &prefix, &suffix, 2, 6).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.run_starts(0), &[0, 4]);
        assert_eq!(result.run_starts(1), &[3, 4]);
        assert_eq!(result.run_end(1, 1), 6);
    }

    #[test]
    fn test_span_limit() {
        let prefix = set(vec![A, X, B], vec![0, 4], vec![0]);
        let suffix = set(vec![X, B, C], vec![4], vec![0]);

        // a..c covers six tokens
        let result = query_intersect(Pattern::new(vec![A, X, B, C]), &prefix, &suffix, 2, 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_leading_gap_counts_toward_span() {
        // [X a b] x [a b c] -> [X a b c]
        let prefix = set(vec![X, A, B], vec![1], vec![0]);
        let suffix = set(vec![A, B, C], vec![1], vec![0]);
        let pattern = Pattern::new(vec![X, A, B, C]);

        let result = query_intersect(pattern.clone(), &prefix, &suffix, 2, 5).unwrap();
        assert_eq!(result.len(), 1);

        let result = query_intersect(pattern, &prefix, &suffix, 2, 4).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_shifted_first_run() {
        // [a b X] x [b X c] -> [a b X c]
        let prefix = set(vec![A, B, X], vec![0, 6], vec![0, 0]);
        let suffix = set(vec![B, X, C], vec![1, 3, 1, 4, 7, 9], vec![0, 0, 0]);

        let result = query_intersect(Pattern::new(vec![A, B, X, C]), &prefix, &suffix, 2, 10).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.run_starts(0), &[0, 3]);
        assert_eq!(result.run_starts(1), &[0, 4]);
        assert_eq!(result.run_starts(2), &[6, 9]);
    }

    #[test]
    fn test_overlap_mismatch_is_invariant_error() {
        let prefix = set(vec![A, X, B], vec![], vec![]);
        let suffix = set(vec![X, B, X, C, X], vec![], vec![]);
        let err = Intersector::new(&prefix, &suffix, 2, 10).err().unwrap();
        assert!(err.is_invariant());
        assert!(matches!(
            err,
            MatchError::Invariant(InvariantViolation::OverlapLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_compare_orders() {
        let prefix = set(vec![A, X], vec![4], vec![1]);
        let suffix = set(vec![X, B], vec![2, 7, 20], vec![1, 1, 1]);
        let other = set(vec![X, B], vec![2], vec![0]);

        let cmp = Intersector::new(&prefix, &suffix, 2, 5).unwrap();
        assert_eq!(cmp.compare(0, 0), Ordering::Greater);
        assert_eq!(cmp.compare(0, 1), Ordering::Equal);
        assert_eq!(cmp.compare(0, 2), Ordering::Less);

        let cmp = Intersector::new(&prefix, &other, 2, 5).unwrap();
        assert_eq!(cmp.compare(0, 0), Ordering::Greater);
    }
}
