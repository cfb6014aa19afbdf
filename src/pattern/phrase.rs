//! A single corpus-anchored occurrence of a pattern

use super::pattern::Pattern;
use super::phrases::HierarchicalPhraseSet;

/// One occurrence: where each terminal run starts and ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalPhrase {
    pattern: Pattern,
    run_starts: Vec<usize>,
    run_ends: Vec<usize>,
    sentence_number: usize,
    /// Span in tokens from the first terminal to the end of the last one
    length: usize,
}

impl HierarchicalPhrase {
    /// Build an occurrence from explicit run starts
    pub fn new(pattern: Pattern, run_starts: Vec<usize>, sentence_number: usize) -> Self {
        let run_ends: Vec<usize> = run_starts
            .iter()
            .zip(pattern.terminal_run_lengths())
            .map(|(&start, &len)| start + len)
            .collect();
        let length = match (run_starts.first(), run_ends.last()) {
            (Some(&first), Some(&last)) => last - first,
            _ => 0,
        };
        Self {
            pattern,
            run_starts,
            run_ends,
            sentence_number,
            length,
        }
    }

    /// Copy occurrence `occ` out of a set
    pub fn from_set(set: &HierarchicalPhraseSet, occ: usize) -> Self {
        Self::new(
            set.pattern().clone(),
            set.run_starts(occ).to_vec(),
            set.sentence_number(occ),
        )
    }

    /// Combine an occurrence of `a α` with an occurrence of `α b` into one of `a α b`
    ///
    /// When the prefix ends with a gap, `b` is a new one-token run placed at
    /// the suffix's last run start. Otherwise `b` extends the prefix's last
    /// run by one token. If `pattern` itself ends with a gap the stored length
    /// is the prefix's: a gap directly after a gap has no terminal to measure
    /// to, so the prefix length is kept as is.
    pub fn merge(pattern: Pattern, prefix: &HierarchicalPhrase, suffix: &HierarchicalPhrase) -> Self {
        let mut run_starts = prefix.run_starts.clone();
        let mut run_ends = prefix.run_ends.clone();
        let length;

        if prefix.pattern.ends_with_nonterminal() {
            let last_start = suffix.run_starts.last().copied().unwrap_or_default();
            run_starts.push(last_start);
            run_ends.push(last_start + 1);
            length = if pattern.ends_with_nonterminal() {
                prefix.length
            } else {
                last_start + 1 - run_starts[0]
            };
        } else if pattern.ends_with_nonterminal() {
            length = prefix.length;
        } else {
            length = prefix.length + 1;
            if let Some(end) = run_ends.last_mut() {
                *end += 1;
            }
        }

        Self {
            pattern,
            run_starts,
            run_ends,
            sentence_number: prefix.sentence_number,
            length,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn run_starts(&self) -> &[usize] {
        &self.run_starts
    }

    pub fn run_ends(&self) -> &[usize] {
        &self.run_ends
    }

    pub fn sentence_number(&self) -> usize {
        self.sentence_number
    }

    /// Span length; leading and trailing gaps are not included
    pub fn span_length(&self) -> usize {
        self.length
    }

    pub fn first_terminal_index(&self) -> Option<usize> {
        self.run_starts.first().copied()
    }

    pub fn last_terminal_end(&self) -> Option<usize> {
        self.run_ends.last().copied()
    }
}
