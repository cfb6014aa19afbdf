//! Token patterns with nonterminal gaps
//!
//! A [`Pattern`] is an immutable token sequence in which [`X`] marks a gap.
//! Everything else the matcher needs about a pattern (arity, terminal run
//! lengths, leading and trailing gaps) is derived once at construction.

use crate::corpus::vocab::{Vocabulary, X, X_STRING};
use crate::error::{MatchError, Result};
use std::fmt;

/// Immutable token sequence; negative tokens are nonterminals
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pattern {
    words: Box<[i32]>,
    /// Length of each maximal run of terminals, left to right
    run_lengths: Box<[usize]>,
    arity: usize,
}

#[inline]
fn is_nonterminal(token: i32) -> bool {
    token < 0
}

impl Pattern {
    pub fn new(words: impl Into<Vec<i32>>) -> Self {
        let words: Vec<i32> = words.into();
        let mut run_lengths = Vec::new();
        let mut arity = 0;
        let mut current = 0;
        for &token in &words {
            if is_nonterminal(token) {
                arity += 1;
                if current > 0 {
                    run_lengths.push(current);
                    current = 0;
                }
            } else {
                current += 1;
            }
        }
        if current > 0 {
            run_lengths.push(current);
        }

        Self {
            words: words.into_boxed_slice(),
            run_lengths: run_lengths.into_boxed_slice(),
            arity,
        }
    }

    /// The empty pattern (labels the tree root)
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The pattern consisting of a single gap
    pub fn nonterminal() -> Self {
        Self::new(vec![X])
    }

    /// Parse a whitespace-separated pattern; `[X]` and `X` denote gaps
    pub fn parse(vocab: &Vocabulary, text: &str) -> Result<Self> {
        let words = text
            .split_whitespace()
            .map(|w| {
                if w == "X" || w == X_STRING {
                    return Ok(X);
                }
                vocab
                    .id_of(w)
                    .ok_or_else(|| MatchError::UnknownToken(w.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(words))
    }

    #[inline]
    pub fn words(&self) -> &[i32] {
        &self.words
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of nonterminals
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn terminal_run_lengths(&self) -> &[usize] {
        &self.run_lengths
    }

    /// Number of terminal runs
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.run_lengths.len()
    }

    pub fn starts_with_nonterminal(&self) -> bool {
        self.words.first().is_some_and(|&t| is_nonterminal(t))
    }

    pub fn ends_with_nonterminal(&self) -> bool {
        self.words.last().is_some_and(|&t| is_nonterminal(t))
    }

    /// True if the last two tokens are both terminals
    pub fn ends_with_two_terminals(&self) -> bool {
        let n = self.words.len();
        n > 1 && !is_nonterminal(self.words[n - 1]) && !is_nonterminal(self.words[n - 2])
    }

    pub fn second_token_is_terminal(&self) -> bool {
        self.words.len() > 1 && !is_nonterminal(self.words[1])
    }

    /// Append one token
    pub fn with_token(&self, token: i32) -> Self {
        let mut words = self.words.to_vec();
        words.push(token);
        Self::new(words)
    }

    /// Prepend a gap
    pub fn with_initial_x(&self) -> Self {
        let mut words = Vec::with_capacity(self.len() + 1);
        words.push(X);
        words.extend_from_slice(&self.words);
        Self::new(words)
    }

    /// Append a gap
    pub fn with_final_x(&self) -> Self {
        self.with_token(X)
    }

    /// The pattern with its first token removed
    pub fn without_first(&self) -> Self {
        Self::new(self.words.get(1..).unwrap_or_default().to_vec())
    }

    /// The pattern with its last token removed
    pub fn without_last(&self) -> Self {
        let end = self.words.len().saturating_sub(1);
        Self::new(self.words[..end].to_vec())
    }

    /// The terminal runs, in order
    pub fn split(&self) -> Vec<&[i32]> {
        self.words
            .split(|&t| is_nonterminal(t))
            .filter(|run| !run.is_empty())
            .collect()
    }

    /// Render with vocabulary words, e.g. `[it X him]`
    pub fn display<'a>(&'a self, vocab: &'a Vocabulary) -> PatternDisplay<'a> {
        PatternDisplay {
            pattern: self,
            vocab,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern{}", self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, &token) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if is_nonterminal(token) {
                f.write_str("X")?;
            } else {
                write!(f, "{}", token)?;
            }
        }
        f.write_str("]")
    }
}

/// [`Pattern`] paired with a vocabulary for printing
pub struct PatternDisplay<'a> {
    pattern: &'a Pattern,
    vocab: &'a Vocabulary,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, &token) in self.pattern.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if is_nonterminal(token) {
                f.write_str("X")?;
            } else {
                f.write_str(self.vocab.word_of(token))?;
            }
        }
        f.write_str("]")
    }
}
