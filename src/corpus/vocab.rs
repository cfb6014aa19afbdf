//! Vocabulary: bijection between token strings and integer ids
//!
//! Terminal ids are non-negative and dense. The reserved negative id [`X`]
//! stands for a gap of any length (a nonterminal) and never occurs in a
//! corpus.

use crate::error::{MatchError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Token id of the nonterminal wildcard
pub const X: i32 = -1;

/// Printed form of [`X`]
pub const X_STRING: &str = "[X]";

/// Id handed out for words outside the vocabulary by [`Vocabulary::encode_lenient`]
///
/// It is larger than any terminal id, so it sorts after every corpus token and
/// never matches.
pub const UNKNOWN_WORD: i32 = i32::MAX;

/// Token string <-> id mapping
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    ids: FxHashMap<String, i32>,
}

/// On-disk form (`vocab.json`)
#[derive(Serialize, Deserialize)]
struct VocabFile {
    words: Vec<String>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary from the distinct whitespace tokens of `lines`
    ///
    /// Ids follow sorted string order, so the suffix array of an encoded
    /// corpus also orders its suffixes alphabetically.
    pub fn from_sentences<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = lines
            .into_iter()
            .flat_map(|line| line.split_whitespace())
            .collect();
        Self::with_words(distinct)
    }

    /// Build a vocabulary assigning ids in iteration order
    pub fn with_words<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let mut vocab = Self::new();
        for word in words {
            vocab.add_terminal(word.as_ref());
        }
        vocab
    }

    /// Add a terminal, returning its id (existing id if already present)
    pub fn add_terminal(&mut self, word: &str) -> i32 {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as i32;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    /// Look up the id of a terminal
    ///
    /// `[X]` is an ordinary word here; only [`Pattern::parse`](crate::pattern::Pattern::parse)
    /// reads it as a gap.
    pub fn id_of(&self, word: &str) -> Option<i32> {
        self.ids.get(word).copied()
    }

    /// Printable form of an id
    pub fn word_of(&self, id: i32) -> &str {
        if id < 0 {
            return X_STRING;
        }
        self.words
            .get(id as usize)
            .map(String::as_str)
            .unwrap_or("<unk>")
    }

    /// Encode a whitespace-separated sentence, failing on unknown words
    pub fn encode(&self, sentence: &str) -> Result<Vec<i32>> {
        sentence
            .split_whitespace()
            .map(|w| {
                self.id_of(w)
                    .ok_or_else(|| MatchError::UnknownToken(w.to_string()))
            })
            .collect()
    }

    /// Encode a sentence, mapping unknown words to [`UNKNOWN_WORD`]
    pub fn encode_lenient(&self, sentence: &str) -> Vec<i32> {
        sentence
            .split_whitespace()
            .map(|w| self.id_of(w).unwrap_or(UNKNOWN_WORD))
            .collect()
    }

    /// Decode ids back into a space-separated string
    pub fn decode(&self, ids: &[i32]) -> String {
        ids.iter()
            .map(|&id| self.word_of(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of terminals
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Write the vocabulary as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        let data = VocabFile {
            words: self.words.clone(),
        };
        serde_json::to_writer(file, &data)
            .map_err(|e| MatchError::invalid_format("vocab.json", e.to_string()))
    }

    /// Read a vocabulary written by [`Vocabulary::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let data: VocabFile = serde_json::from_reader(file)
            .map_err(|e| MatchError::invalid_format("vocab.json", e.to_string()))?;
        Ok(Self::with_words(data.words))
    }
}
