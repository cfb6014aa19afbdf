//! Error types shared by the matching core.
//!
//! Three kinds of failure are kept apart:
//!
//! - a phrase that does not occur is *not* an error; lookups return `Option`
//!   or an empty [`HierarchicalPhraseSet`](crate::pattern::HierarchicalPhraseSet)
//! - malformed or inconsistent persisted data is reported at load time
//! - [`InvariantViolation`] means tree construction itself went wrong and the
//!   resulting occurrence sets cannot be trusted

use std::fmt;
use std::io;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors produced while loading an index or building a prefix tree
#[derive(Debug)]
pub enum MatchError {
    /// Underlying I/O failure
    Io(io::Error),
    /// A persisted file is truncated or carries an unexpected header
    InvalidFormat { file: String, reason: String },
    /// The persisted suffix array does not cover the corpus exactly
    SizeMismatch { expected: usize, found: usize },
    /// A query word is missing from the vocabulary
    UnknownToken(String),
    /// Prefix tree construction broke one of its own invariants
    Invariant(InvariantViolation),
}

/// Internal consistency failures during tree construction or merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The suffix-link target of a new node has no child for `token`
    MissingSuffixLink { node: usize, token: i32 },
    /// Prefix and suffix patterns disagree on how many runs they share
    OverlapLengthMismatch { prefix: usize, suffix: usize },
    /// A child for `token` already exists under `node`
    DuplicateChild { node: usize, token: i32 },
}

impl MatchError {
    /// True for errors that indicate a construction bug rather than bad input
    pub fn is_invariant(&self) -> bool {
        matches!(self, MatchError::Invariant(_))
    }

    pub(crate) fn invalid_format(file: impl Into<String>, reason: impl Into<String>) -> Self {
        MatchError::InvalidFormat {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Io(e) => write!(f, "IO error: {}", e),
            MatchError::InvalidFormat { file, reason } => {
                write!(f, "Invalid {}: {}", file, reason)
            }
            MatchError::SizeMismatch { expected, found } => write!(
                f,
                "Suffix array size {} does not match corpus size {}",
                found, expected
            ),
            MatchError::UnknownToken(word) => write!(f, "Unknown token: {}", word),
            MatchError::Invariant(v) => write!(f, "Internal invariant violated: {}", v),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::MissingSuffixLink { node, token } => write!(
                f,
                "suffix link of node {} has no child for token {}",
                node, token
            ),
            InvariantViolation::OverlapLengthMismatch { prefix, suffix } => write!(
                f,
                "prefix overlap has {} runs but suffix overlap has {}",
                prefix, suffix
            ),
            InvariantViolation::DuplicateChild { node, token } => {
                write!(f, "node {} already has a child for token {}", node, token)
            }
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MatchError {
    fn from(e: io::Error) -> Self {
        MatchError::Io(e)
    }
}

impl From<InvariantViolation> for MatchError {
    fn from(v: InvariantViolation) -> Self {
        MatchError::Invariant(v)
    }
}
